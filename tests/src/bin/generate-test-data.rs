use chrono::Duration;
use parish_client::api::{Comment, CommentId, CommentList};
use rand::{seq::SliceRandom, Rng};

const NUM_AUTHORS: usize = 6;
const NUM_COMMENTS: usize = 40;
const MAX_WORDS: usize = 60;

// probability that a comment answers an earlier one rather than the post
const REPLY_RATIO: f64 = 0.6;
const MAX_LIKES: u64 = 12;

fn gen_author(rng: &mut impl Rng) -> String {
    let mut name = lipsum::lipsum_words_with_rng(&mut *rng, 2);
    // lipsum ends its text with a period
    name.retain(|c| c.is_alphabetic() || c == ' ');
    name
}

fn main() {
    let mut rng = rand::thread_rng();
    let authors = (0..NUM_AUTHORS)
        .map(|_| gen_author(&mut rng))
        .collect::<Vec<_>>();

    let mut created_at = chrono::Utc::now() - Duration::days(30);
    let mut comments: Vec<Comment> = Vec::with_capacity(NUM_COMMENTS);
    for i in 0..NUM_COMMENTS {
        created_at = created_at + Duration::minutes(rng.gen_range(1..600));
        let parent_comment_id = match comments.is_empty() || !rng.gen_bool(REPLY_RATIO) {
            true => None,
            false => comments.choose(&mut rng).map(|c| c.id.clone()),
        };
        let words = rng.gen_range(1..=MAX_WORDS);
        comments.push(Comment {
            id: CommentId(format!("comment-{i}")),
            author_name: authors.choose(&mut rng).cloned().unwrap_or_default(),
            content: lipsum::lipsum_words_with_rng(&mut rng, words),
            created_at,
            parent_comment_id,
            like_count: rng.gen_range(0..=MAX_LIKES),
            has_liked: rng.gen_bool(0.2),
        });
    }

    let list = CommentList {
        comment_count: comments.len() as u64,
        comments,
    };
    match serde_json::to_string_pretty(&list) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed serializing test data: {err}"),
    }
}
