//! Comments attached to todos.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CommentId, TodoId, UserId};

/// Validation errors for [`CommentText`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentTextError {
    /// Text was blank.
    Empty,
}

impl fmt::Display for CommentTextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "comment text must not be empty"),
        }
    }
}

impl std::error::Error for CommentTextError {}

/// Non-blank comment body. Interior and surrounding whitespace is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Looks good to me")]
pub struct CommentText(String);

impl CommentText {
    /// Validate and construct comment text.
    pub fn new(raw: impl Into<String>) -> Result<Self, CommentTextError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CommentTextError::Empty);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CommentText> for String {
    fn from(value: CommentText) -> Self {
        value.0
    }
}

impl TryFrom<String> for CommentText {
    type Error = CommentTextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Identifier.
    pub id: CommentId,
    /// Todo the comment belongs to.
    pub todo: TodoId,
    /// Author; set from the session, never from the payload.
    pub author: UserId,
    /// Body.
    pub text: CommentText,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Target todo.
    pub todo: TodoId,
    /// Authenticated author.
    pub author: UserId,
    /// Body.
    pub text: CommentText,
}
