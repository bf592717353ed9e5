use crate::{CommentId, PostSlug};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub like_count: u64,
    pub has_liked: bool,
}

/// Something that can be liked: a post, or a comment under a post
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum LikeTarget {
    Post(PostSlug),
    Comment(PostSlug, CommentId),
}

impl LikeTarget {
    pub fn post(&self) -> &PostSlug {
        match self {
            LikeTarget::Post(p) | LikeTarget::Comment(p, _) => p,
        }
    }

    pub fn is_post(&self) -> bool {
        matches!(self, LikeTarget::Post(_))
    }

    /// Unencoded path segments of the like resource, below the api root
    pub fn path_segments(&self) -> Vec<&str> {
        match self {
            LikeTarget::Post(p) => vec!["blog", p.as_str(), "likes"],
            LikeTarget::Comment(p, c) => {
                vec!["blog", p.as_str(), "comments", c.as_str(), "likes"]
            }
        }
    }
}
