//! Port for the identity collaborator.
//!
//! Inbound adapters authenticate and register through this trait without
//! knowing how credentials are stored, so handler tests can substitute a
//! double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

/// Authentication and registration use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    ///
    /// Unknown users and wrong passwords both yield the same
    /// `invalid_request` error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    /// Create a user able to log in with the registered password.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;
}
