use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;

use crate::{
    api::{Comment, CommentId, LikeStatus, LikeTarget, PostSlug, Session},
    Backend, CommentComposer, CommentThread, LikeToggle, Notifier, ShareLinks, ShareMenu,
    SubmitOutcome, ToggleOutcome,
};

/// Likes, comments and sharing for one post.
///
/// Each panel owns all of its state, so that two panels never see each
/// other's drafts, flags or counters.
#[derive(Debug)]
pub struct EngagementPanel {
    post: PostSlug,
    post_like: LikeToggle,
    comment_likes: Mutex<HashMap<CommentId, Arc<LikeToggle>>>,
    thread: CommentThread,
    composer: CommentComposer,
    share: ShareMenu,
    expanded: AtomicBool,
}

impl EngagementPanel {
    pub fn new(post: PostSlug, share: ShareLinks) -> EngagementPanel {
        EngagementPanel {
            post_like: LikeToggle::new(LikeTarget::Post(post.clone())),
            post,
            comment_likes: Mutex::new(HashMap::new()),
            thread: CommentThread::new(),
            composer: CommentComposer::new(),
            share: ShareMenu::new(share),
            expanded: AtomicBool::new(false),
        }
    }

    pub fn post(&self) -> &PostSlug {
        &self.post
    }

    pub fn post_like(&self) -> &LikeToggle {
        &self.post_like
    }

    pub fn thread(&self) -> &CommentThread {
        &self.thread
    }

    pub fn composer(&self) -> &CommentComposer {
        &self.composer
    }

    pub fn share(&self) -> &ShareMenu {
        &self.share
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.load(Ordering::Acquire)
    }

    /// Like state of a comment, created on first use out of the comment's
    /// own counters and kept until a reload no longer lists the comment
    pub fn comment_like(&self, comment: &Comment) -> Arc<LikeToggle> {
        self.comment_likes
            .lock()
            .entry(comment.id.clone())
            .or_insert_with(|| {
                Arc::new(LikeToggle::with_status(
                    LikeTarget::Comment(self.post.clone(), comment.id.clone()),
                    LikeStatus {
                        like_count: comment.like_count,
                        has_liked: comment.has_liked,
                    },
                ))
            })
            .clone()
    }

    /// Fetch the post's like status
    pub async fn mount<B: ?Sized + Backend>(&self, backend: &B) {
        self.post_like.load(backend).await
    }

    /// Open or close the comment section, fetching the comments when opening.
    /// Returns whether the section is now open.
    pub async fn toggle_expanded<B, N>(&self, backend: &B, notifier: &N) -> bool
    where
        B: ?Sized + Backend,
        N: ?Sized + Notifier,
    {
        let now_expanded = !self.expanded.fetch_xor(true, Ordering::AcqRel);
        if now_expanded && self.thread.load(backend, &self.post, notifier).await {
            self.resync_comment_likes();
        }
        now_expanded
    }

    /// Forget comments the fresh list dropped and take the counters it
    /// carries for the others
    fn resync_comment_likes(&self) {
        let comments = self.thread.comments();
        let listed = comments.iter().map(|c| &c.id).collect::<HashSet<_>>();
        let mut likes = self.comment_likes.lock();
        likes.retain(|id, _| listed.contains(id));
        for c in &comments {
            if let Some(like) = likes.get(&c.id) {
                like.reseed(LikeStatus {
                    like_count: c.like_count,
                    has_liked: c.has_liked,
                });
            }
        }
    }

    /// Fetch the like status of every loaded comment, one request each
    pub async fn mount_comment_likes<B: ?Sized + Backend>(&self, backend: &B) {
        let likes = self
            .thread
            .comments()
            .iter()
            .map(|c| self.comment_like(c))
            .collect::<Vec<_>>();
        futures::future::join_all(likes.iter().map(|l| l.load(backend))).await;
    }

    pub async fn toggle_post_like<B, N>(&self, backend: &B, notifier: &N) -> ToggleOutcome
    where
        B: ?Sized + Backend,
        N: ?Sized + Notifier,
    {
        self.post_like.toggle(backend, notifier).await
    }

    pub async fn submit_comment<B, N>(
        &self,
        backend: &B,
        session: &Session,
        notifier: &N,
    ) -> SubmitOutcome
    where
        B: ?Sized + Backend,
        N: ?Sized + Notifier,
    {
        self.composer
            .submit(backend, &self.post, session, &self.thread, notifier)
            .await
    }
}
