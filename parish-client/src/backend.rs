use std::time::Duration;

use async_trait::async_trait;

use crate::{
    api::{CommentCreated, CommentList, LikeStatus, LikeTarget, NewComment, PostSlug},
    Error,
};

// Browser futures are not Send, so the seams only require it off-wasm

/// The REST backend serving posts' likes and comments
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Backend {
    async fn fetch_likes(&self, target: &LikeTarget) -> Result<LikeStatus, Error>;

    /// Like (`liked = true`) or unlike the target, returning the new status
    async fn set_liked(&self, target: &LikeTarget, liked: bool) -> Result<LikeStatus, Error>;

    async fn fetch_comments(&self, post: &PostSlug) -> Result<CommentList, Error>;

    async fn submit_comment(
        &self,
        post: &PostSlug,
        comment: &NewComment,
    ) -> Result<CommentCreated, Error>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Transient user-visible notifications
pub trait Notifier {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Success,
            message: String::from(message),
        })
    }

    fn error(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Error,
            message: String::from(message),
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Opens an url in a new window or tab
pub trait Opener {
    fn open(&self, url: &str);
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Timer {
    async fn sleep(&self, d: Duration);
}
