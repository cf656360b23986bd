//! Driven port for identity records.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Store connection could not be established.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user directory query failed: {message}",
        /// The username is already taken.
        DuplicateUsername { username: String } => "username {username} is already taken",
        /// The user still owns projects or authored comments.
        Protected { id: UserId } => "user {id} is still referenced",
    }
}

/// Lookup and lifecycle of user rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a single user.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserDirectoryError>;

    /// Fetch every listed user that exists, ordered by id.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserDirectoryError>;

    /// Fetch a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserDirectoryError>;

    /// Insert a user row.
    ///
    /// Fails with [`UserDirectoryError::DuplicateUsername`] when the name is
    /// taken.
    async fn create(&self, user: &NewUser) -> Result<User, UserDirectoryError>;

    /// Delete a user.
    ///
    /// Rejected with [`UserDirectoryError::Protected`] while the user owns a
    /// project or authored a comment. Otherwise the user's memberships and
    /// assignments are removed in the same transaction. Returns `false` when
    /// no such user exists.
    async fn delete(&self, id: UserId) -> Result<bool, UserDirectoryError>;
}
