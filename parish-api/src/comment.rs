use crate::Time;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> CommentId {
        CommentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A comment as the backend lists it: flat, with an optional pointer to its parent
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub author_name: String,
    pub content: String,
    pub created_at: Time,

    /// None (or a dangling id) means this is a top-level comment
    #[serde(default)]
    pub parent_comment_id: Option<CommentId>,

    #[serde(default)]
    pub like_count: u64,

    /// Whether the current viewer liked this comment, computed server-side
    #[serde(default)]
    pub has_liked: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentList {
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub comment_count: u64,
}

/// A comment along with its (recursively nested) replies.
///
/// This is only ever built client-side out of a flat `CommentList`, and is
/// rebuilt each time the list changes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentWithReplies {
    pub comment: Comment,
    pub replies: Vec<CommentWithReplies>,
}

// Reply chains can be arbitrarily long, so they are torn down level by level
// rather than through the recursive drop glue
impl Drop for CommentWithReplies {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut c) = pending.pop() {
            pending.append(&mut c.replies);
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,
    pub author_name: String,
    pub author_email: String,

    // always serialized, as null for top-level comments
    pub parent_comment_id: Option<CommentId>,
}

/// Moderation status the backend assigns to a freshly submitted comment
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Approved,
    Pending,
    Rejected,
}

impl CommentStatus {
    /// Whether the comment is visible to everyone right away
    pub fn is_visible(&self) -> bool {
        match self {
            CommentStatus::Approved => true,
            CommentStatus::Pending | CommentStatus::Rejected => false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CreatedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub status: CommentStatus,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentCreated {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<CreatedComment>,
}
