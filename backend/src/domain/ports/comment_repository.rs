//! Driven port for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, NewComment, TodoId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

/// Storage for comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment.
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError>;

    /// Fetch a single comment.
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Comments on todos of the user's projects, optionally for one todo,
    /// ordered by creation time then id.
    async fn list_for_member(
        &self,
        user: UserId,
        todo: Option<TodoId>,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Delete a comment. Returns `false` when missing.
    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError>;
}
