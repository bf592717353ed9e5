use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::{
    api::{Comment, CommentId, CommentWithReplies, PostSlug},
    build_comment_tree,
    guard::InFlight,
    Backend, Notifier,
};

/// Replies are offered only on comments nested less deeply than this
pub const MAX_DEPTH: usize = 3;

pub fn can_reply(depth: usize) -> bool {
    depth < MAX_DEPTH
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThreadEntry<'a> {
    pub comment: &'a Comment,
    pub depth: usize,
    pub show_reply: bool,
}

/// Pre-order listing of a reply forest, roots being at depth 0
pub fn flatten_thread(forest: &[CommentWithReplies], max_depth: usize) -> Vec<ThreadEntry<'_>> {
    let mut res = Vec::new();
    let mut pending = forest.iter().rev().map(|c| (c, 0)).collect::<Vec<_>>();
    while let Some((c, depth)) = pending.pop() {
        res.push(ThreadEntry {
            comment: &c.comment,
            depth,
            show_reply: depth < max_depth,
        });
        pending.extend(c.replies.iter().rev().map(|r| (r, depth + 1)));
    }
    res
}

#[derive(Debug, Default)]
struct ThreadState {
    comments: Vec<Comment>,
    comment_count: u64,
}

/// The comments of a post, as last fetched plus those appended locally since
#[derive(Debug, Default)]
pub struct CommentThread {
    state: Mutex<ThreadState>,
    loading: AtomicBool,
}

impl CommentThread {
    pub fn new() -> CommentThread {
        CommentThread::default()
    }

    pub fn is_comments_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn comment_count(&self) -> u64 {
        self.state.lock().comment_count
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.state.lock().comments.clone()
    }

    pub fn find(&self, id: &CommentId) -> Option<Comment> {
        self.state
            .lock()
            .comments
            .iter()
            .find(|c| c.id == *id)
            .cloned()
    }

    pub fn tree(&self) -> Vec<CommentWithReplies> {
        build_comment_tree(self.comments())
    }

    /// Add a comment the server already made visible
    pub fn append(&self, comment: Comment) {
        let mut state = self.state.lock();
        state.comments.push(comment);
        state.comment_count += 1;
    }

    /// Replace the comments with the server's list. Returns false if the
    /// fetch failed or another one was already running.
    pub async fn load<B, N>(&self, backend: &B, post: &PostSlug, notifier: &N) -> bool
    where
        B: ?Sized + Backend,
        N: ?Sized + Notifier,
    {
        let _loading = match InFlight::acquire(&self.loading) {
            Some(l) => l,
            None => return false,
        };
        match backend.fetch_comments(post).await {
            Ok(list) => {
                tracing::debug!(%post, num_comments = list.comments.len(), "fetched comments");
                let mut state = self.state.lock();
                state.comments = list.comments;
                state.comment_count = list.comment_count;
                true
            }
            Err(err) => {
                err.log("fetching comments");
                notifier.error(&err.toast_message("Failed to load comments"));
                false
            }
        }
    }
}
