use chrono::Utc;

pub type Time = chrono::DateTime<Utc>;

mod comment;
pub use comment::{
    Comment, CommentCreated, CommentId, CommentList, CommentStatus, CommentWithReplies,
    CreatedComment, NewComment,
};

mod error;
pub use error::Error;

mod like;
pub use like::{LikeStatus, LikeTarget};

mod post;
pub use post::PostSlug;

mod session;
pub use session::{Session, SessionUser};
