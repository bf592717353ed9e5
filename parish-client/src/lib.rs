mod backend;
pub use backend::{Backend, Clipboard, Notifier, Opener, Timer, Toast, ToastLevel};

mod compose;
pub use compose::{CommentComposer, ReplyTarget, SubmitOutcome, ValidationError};

mod error;
pub use error::{Error, GENERIC_FAILURE};

mod format;
pub use format::format_relative;

mod guard;

mod http;
pub use self::http::HttpBackend;

mod like;
pub use like::{LikeToggle, ToggleOutcome};

mod panel;
pub use panel::EngagementPanel;

mod share;
pub use share::{canonical_url, ShareLinks, ShareMenu, SharePlatform, COPIED_RESET};

mod thread;
pub use thread::{can_reply, flatten_thread, CommentThread, ThreadEntry, MAX_DEPTH};

mod tree;
pub use tree::{build_comment_tree, count_nodes};

pub mod api {
    pub use parish_api::*;
}
