//! Driving port for comment use-cases.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, CommentText, Error, TodoId, UserId};

/// Command to comment on a todo. The author is always the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentRequest {
    /// Authenticated caller, recorded as author.
    pub actor: UserId,
    /// Target todo.
    pub todo: TodoId,
    /// Body.
    pub text: CommentText,
}

/// Comment use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentOperations: Send + Sync {
    /// Comment on a todo of a project the actor belongs to.
    async fn create(&self, request: CreateCommentRequest) -> Result<Comment, Error>;

    /// Visible comments, optionally for one todo.
    async fn list(&self, actor: UserId, todo: Option<TodoId>) -> Result<Vec<Comment>, Error>;

    /// One visible comment.
    async fn get(&self, actor: UserId, id: CommentId) -> Result<Comment, Error>;

    /// Delete a comment; author only.
    async fn delete(&self, actor: UserId, id: CommentId) -> Result<(), Error>;
}
