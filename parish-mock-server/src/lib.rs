use std::{
    collections::{BTreeMap, HashSet, VecDeque},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use parish_client::{
    api::{
        Comment, CommentCreated, CommentId, CommentList, CommentStatus, CreatedComment, Error,
        LikeStatus, LikeTarget, NewComment, PostSlug,
    },
    Backend,
};
use parking_lot::Mutex;
use tokio::sync::watch;

/// Whoever the mock backend is answering to
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Viewer {
    pub id: String,
    pub member: bool,
}

impl Viewer {
    pub fn member(id: &str) -> Viewer {
        Viewer {
            id: String::from(id),
            member: true,
        }
    }

    pub fn guest(id: &str) -> Viewer {
        Viewer {
            id: String::from(id),
            member: false,
        }
    }
}

#[derive(Debug)]
struct StoredComment {
    comment: Comment,
    status: CommentStatus,
    likes: HashSet<Viewer>,
}

impl StoredComment {
    fn as_seen_by(&self, viewer: &Viewer) -> Comment {
        Comment {
            like_count: self.likes.len() as u64,
            has_liked: self.likes.contains(viewer),
            ..self.comment.clone()
        }
    }
}

#[derive(Debug, Default)]
struct Post {
    likes: HashSet<Viewer>,
    comments: Vec<StoredComment>,
}

impl Post {
    fn comment_mut(&mut self, id: &CommentId) -> Result<&mut StoredComment, Error> {
        self.comments
            .iter_mut()
            .find(|c| c.comment.id == *id && c.status.is_visible())
            .ok_or(Error::NotFound)
    }
}

/// In-memory stand-in for the blog's REST backend
#[derive(Debug, Default)]
pub struct MockServer {
    posts: BTreeMap<PostSlug, Post>,
    auto_approve_guests: bool,
    forced_status: Option<CommentStatus>,
    fail_next: Option<Error>,
    next_ids: VecDeque<CommentId>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer::default()
    }

    pub fn create_post(&mut self, slug: &PostSlug) {
        self.posts.entry(slug.clone()).or_default();
    }

    /// By default only members' comments are approved right away
    pub fn set_auto_approve_guests(&mut self, approve: bool) {
        self.auto_approve_guests = approve;
    }

    /// Give every new comment this status, whoever wrote it
    pub fn force_status(&mut self, status: Option<CommentStatus>) {
        self.forced_status = status;
    }

    /// Answer the next request with this error
    pub fn fail_next(&mut self, err: Error) {
        self.fail_next = Some(err);
    }

    /// Use this id for the next submitted comment instead of a random one
    pub fn queue_comment_id(&mut self, id: CommentId) {
        self.next_ids.push_back(id);
    }

    /// Add a comment as though it had been submitted and moderated earlier
    pub fn insert_comment(
        &mut self,
        slug: &PostSlug,
        comment: Comment,
        status: CommentStatus,
    ) -> Result<(), Error> {
        let post = self.posts.get_mut(slug).ok_or(Error::NotFound)?;
        post.comments.push(StoredComment {
            comment: Comment {
                like_count: 0,
                has_liked: false,
                ..comment
            },
            status,
            likes: HashSet::new(),
        });
        Ok(())
    }

    /// Moderate a stored comment after the fact
    pub fn set_status(
        &mut self,
        slug: &PostSlug,
        id: &CommentId,
        status: CommentStatus,
    ) -> Result<(), Error> {
        let post = self.posts.get_mut(slug).ok_or(Error::NotFound)?;
        let stored = post
            .comments
            .iter_mut()
            .find(|c| c.comment.id == *id)
            .ok_or(Error::NotFound)?;
        stored.status = status;
        Ok(())
    }

    /// Number of comments stored for a post, whatever their status
    pub fn test_num_comments(&self, slug: &PostSlug) -> usize {
        self.posts.get(slug).map(|p| p.comments.len()).unwrap_or(0)
    }

    fn check_failure(&mut self) -> Result<(), Error> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn likes_mut(&mut self, target: &LikeTarget) -> Result<&mut HashSet<Viewer>, Error> {
        let post = self.posts.get_mut(target.post()).ok_or(Error::NotFound)?;
        match target {
            LikeTarget::Post(_) => Ok(&mut post.likes),
            LikeTarget::Comment(_, id) => Ok(&mut post.comment_mut(id)?.likes),
        }
    }

    pub fn fetch_likes(
        &mut self,
        viewer: &Viewer,
        target: &LikeTarget,
    ) -> Result<LikeStatus, Error> {
        self.check_failure()?;
        let likes = self.likes_mut(target)?;
        Ok(LikeStatus {
            like_count: likes.len() as u64,
            has_liked: likes.contains(viewer),
        })
    }

    pub fn set_liked(
        &mut self,
        viewer: &Viewer,
        target: &LikeTarget,
        liked: bool,
    ) -> Result<LikeStatus, Error> {
        self.check_failure()?;
        let likes = self.likes_mut(target)?;
        match liked {
            true => likes.insert(viewer.clone()),
            false => likes.remove(viewer),
        };
        Ok(LikeStatus {
            like_count: likes.len() as u64,
            has_liked: likes.contains(viewer),
        })
    }

    pub fn fetch_comments(
        &mut self,
        viewer: &Viewer,
        slug: &PostSlug,
    ) -> Result<CommentList, Error> {
        self.check_failure()?;
        let post = self.posts.get(slug).ok_or(Error::NotFound)?;
        let comments = post
            .comments
            .iter()
            .filter(|c| c.status.is_visible())
            .map(|c| c.as_seen_by(viewer))
            .collect::<Vec<_>>();
        Ok(CommentList {
            comment_count: comments.len() as u64,
            comments,
        })
    }

    pub fn submit_comment(
        &mut self,
        viewer: &Viewer,
        slug: &PostSlug,
        new: NewComment,
    ) -> Result<CommentCreated, Error> {
        self.check_failure()?;
        if new.content.trim().is_empty() {
            return Err(Error::InvalidRequest(String::from("Comment content is required")));
        }
        if new.author_name.trim().is_empty() || new.author_email.trim().is_empty() {
            return Err(Error::InvalidRequest(String::from("Name and email are required")));
        }
        let status = match (self.forced_status, viewer.member || self.auto_approve_guests) {
            (Some(status), _) => status,
            (None, true) => CommentStatus::Approved,
            (None, false) => CommentStatus::Pending,
        };
        let post = self.posts.get_mut(slug).ok_or(Error::NotFound)?;
        if let Some(parent) = &new.parent_comment_id {
            post.comment_mut(parent)
                .map_err(|_| Error::InvalidRequest(String::from("Parent comment not found")))?;
        }
        let comment = Comment {
            id: self
                .next_ids
                .pop_front()
                .unwrap_or_else(|| CommentId(uuid::Uuid::new_v4().to_string())),
            author_name: new.author_name,
            content: new.content,
            created_at: chrono::Utc::now(),
            parent_comment_id: new.parent_comment_id,
            like_count: 0,
            has_liked: false,
        };
        post.comments.push(StoredComment {
            comment: comment.clone(),
            status,
            likes: HashSet::new(),
        });
        tracing::debug!(%slug, id = %comment.id, ?status, "mock server stored comment");
        let message = match status {
            CommentStatus::Approved => "Comment posted successfully",
            CommentStatus::Pending => "Comment submitted and awaiting moderation",
            CommentStatus::Rejected => "Comment was not accepted",
        };
        Ok(CommentCreated {
            message: String::from(message),
            comment: Some(CreatedComment { comment, status }),
        })
    }
}

/// Requests received by a `MockBackend`, per endpoint
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Calls {
    pub fetch_likes: usize,
    pub set_liked: usize,
    pub fetch_comments: usize,
    pub submit_comment: usize,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.fetch_likes + self.set_liked + self.fetch_comments + self.submit_comment
    }
}

#[derive(Debug, Default)]
struct CallCounters {
    fetch_likes: AtomicUsize,
    set_liked: AtomicUsize,
    fetch_comments: AtomicUsize,
    submit_comment: AtomicUsize,
}

/// `Backend` answering out of a shared `MockServer`, as seen by one viewer
#[derive(Clone, Debug)]
pub struct MockBackend {
    server: Arc<Mutex<MockServer>>,
    viewer: Viewer,
    paused: Arc<watch::Sender<bool>>,
    offline: Arc<AtomicBool>,
    calls: Arc<CallCounters>,
}

impl MockBackend {
    pub fn new(server: Arc<Mutex<MockServer>>, viewer: Viewer) -> MockBackend {
        MockBackend {
            server,
            viewer,
            paused: Arc::new(watch::channel(false).0),
            offline: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(CallCounters::default()),
        }
    }

    /// Backend on the same server, but answering to someone else
    pub fn as_viewer(&self, viewer: Viewer) -> MockBackend {
        MockBackend::new(self.server.clone(), viewer)
    }

    pub fn server(&self) -> &Arc<Mutex<MockServer>> {
        &self.server
    }

    /// Hold every request until `resume` gets called
    pub fn pause(&self) {
        self.paused.send_replace(true);
    }

    pub fn resume(&self) {
        self.paused.send_replace(false);
    }

    /// Make requests fail as though the network was down
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    pub fn calls(&self) -> Calls {
        Calls {
            fetch_likes: self.calls.fetch_likes.load(Ordering::Acquire),
            set_liked: self.calls.set_liked.load(Ordering::Acquire),
            fetch_comments: self.calls.fetch_comments.load(Ordering::Acquire),
            submit_comment: self.calls.submit_comment.load(Ordering::Acquire),
        }
    }

    async fn receive(&self, counter: &AtomicUsize) -> Result<(), parish_client::Error> {
        counter.fetch_add(1, Ordering::AcqRel);
        let mut paused = self.paused.subscribe();
        loop {
            let is_paused = *paused.borrow_and_update();
            if !is_paused || paused.changed().await.is_err() {
                break;
            }
        }
        if self.offline.load(Ordering::Acquire) {
            return Err(anyhow::anyhow!("mock network is offline").into());
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch_likes(&self, target: &LikeTarget) -> Result<LikeStatus, parish_client::Error> {
        self.receive(&self.calls.fetch_likes).await?;
        Ok(self.server.lock().fetch_likes(&self.viewer, target)?)
    }

    async fn set_liked(
        &self,
        target: &LikeTarget,
        liked: bool,
    ) -> Result<LikeStatus, parish_client::Error> {
        self.receive(&self.calls.set_liked).await?;
        Ok(self.server.lock().set_liked(&self.viewer, target, liked)?)
    }

    async fn fetch_comments(&self, post: &PostSlug) -> Result<CommentList, parish_client::Error> {
        self.receive(&self.calls.fetch_comments).await?;
        Ok(self.server.lock().fetch_comments(&self.viewer, post)?)
    }

    async fn submit_comment(
        &self,
        post: &PostSlug,
        comment: &NewComment,
    ) -> Result<CommentCreated, parish_client::Error> {
        self.receive(&self.calls.submit_comment).await?;
        Ok(self
            .server
            .lock()
            .submit_comment(&self.viewer, post, comment.clone())?)
    }
}
