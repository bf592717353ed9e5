use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::{
    api::{CommentId, CommentStatus, NewComment, PostSlug, Session},
    can_reply,
    guard::InFlight,
    Backend, CommentThread, Notifier,
};

/// The comment being replied to
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReplyTarget {
    pub id: CommentId,
    pub author_name: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please write a comment")]
    EmptyContent,

    #[error("Please enter your name")]
    MissingGuestName,

    #[error("Please enter your email")]
    MissingGuestEmail,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// A submission was already in flight, nothing was sent
    Skipped,
    /// Refused before sending anything
    Invalid(ValidationError),
    /// The server accepted the comment, possibly for moderation first
    Posted(Option<CommentStatus>),
    Failed,
}

#[derive(Debug, Default)]
struct Draft {
    content: String,
    guest_name: String,
    guest_email: String,
    replying_to: Option<ReplyTarget>,
}

#[derive(Debug, Default)]
pub struct CommentComposer {
    draft: Mutex<Draft>,
    submitting: AtomicBool,
}

impl CommentComposer {
    pub fn new() -> CommentComposer {
        CommentComposer::default()
    }

    pub fn content(&self) -> String {
        self.draft.lock().content.clone()
    }

    pub fn set_content(&self, content: String) {
        self.draft.lock().content = content;
    }

    pub fn guest_name(&self) -> String {
        self.draft.lock().guest_name.clone()
    }

    pub fn set_guest_name(&self, name: String) {
        self.draft.lock().guest_name = name;
    }

    pub fn guest_email(&self) -> String {
        self.draft.lock().guest_email.clone()
    }

    pub fn set_guest_email(&self, email: String) {
        self.draft.lock().guest_email = email;
    }

    pub fn replying_to(&self) -> Option<ReplyTarget> {
        self.draft.lock().replying_to.clone()
    }

    /// Start replying to a comment shown at `depth`. Returns whether the
    /// reply was accepted, in which case the comment box should get focus.
    pub fn reply_to(&self, target: ReplyTarget, depth: usize) -> bool {
        if !can_reply(depth) {
            return false;
        }
        self.draft.lock().replying_to = Some(target);
        true
    }

    pub fn cancel_reply(&self) {
        self.draft.lock().replying_to = None;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Build the request body out of the current draft
    pub fn validate(&self, session: &Session) -> Result<NewComment, ValidationError> {
        let draft = self.draft.lock();
        let content = draft.content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        let (author_name, author_email) = match &session.user {
            Some(user) => (user.name.clone(), user.email.clone()),
            None => {
                if draft.guest_name.trim().is_empty() {
                    return Err(ValidationError::MissingGuestName);
                }
                if draft.guest_email.trim().is_empty() {
                    return Err(ValidationError::MissingGuestEmail);
                }
                (draft.guest_name.clone(), draft.guest_email.clone())
            }
        };
        Ok(NewComment {
            content: String::from(content),
            author_name,
            author_email,
            parent_comment_id: draft.replying_to.as_ref().map(|r| r.id.clone()),
        })
    }

    /// Post the draft. Only comments the server approved right away are
    /// added to `thread`; the draft is kept if posting fails.
    pub async fn submit<B, N>(
        &self,
        backend: &B,
        post: &PostSlug,
        session: &Session,
        thread: &CommentThread,
        notifier: &N,
    ) -> SubmitOutcome
    where
        B: ?Sized + Backend,
        N: ?Sized + Notifier,
    {
        let _submitting = match InFlight::acquire(&self.submitting) {
            Some(s) => s,
            None => return SubmitOutcome::Skipped,
        };
        let new = match self.validate(session) {
            Ok(new) => new,
            Err(err) => {
                notifier.error(&err.to_string());
                return SubmitOutcome::Invalid(err);
            }
        };

        let created = match backend.submit_comment(post, &new).await {
            Ok(created) => created,
            Err(err) => {
                err.log("posting comment");
                notifier.error(&err.toast_message("Failed to post comment"));
                return SubmitOutcome::Failed;
            }
        };

        let status = created.comment.map(|created| {
            if created.status.is_visible() {
                let mut comment = created.comment;
                if comment.parent_comment_id.is_none() {
                    comment.parent_comment_id = new.parent_comment_id.clone();
                }
                thread.append(comment);
            } else {
                tracing::debug!(status = ?created.status, "comment awaits moderation");
            }
            created.status
        });
        notifier.success(&created.message);

        let mut draft = self.draft.lock();
        draft.content.clear();
        draft.replying_to = None;
        if session.is_guest() {
            draft.guest_name.clear();
            draft.guest_email.clear();
        }
        SubmitOutcome::Posted(status)
    }
}
