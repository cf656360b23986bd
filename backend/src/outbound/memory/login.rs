//! Development stand-in for the identity collaborator.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{LoginService, UserDirectory};
use crate::domain::service_support::map_user_error;
use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

/// Keeps passwords in process memory and user rows in a [`UserDirectory`].
///
/// Credentials vanish on restart. Password hashing and credential
/// persistence belong to the real identity provider.
pub struct DevLoginService {
    users: Arc<dyn UserDirectory>,
    passwords: Mutex<HashMap<String, Zeroizing<String>>>,
}

impl DevLoginService {
    /// Create a service registering users in `users`.
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self {
            users,
            passwords: Mutex::new(HashMap::new()),
        }
    }

    fn invalid_credentials() -> Error {
        Error::invalid_request("Invalid credentials.")
    }

    fn password_matches(&self, credentials: &LoginCredentials) -> Result<bool, Error> {
        let passwords = self
            .passwords
            .lock()
            .map_err(|_| Error::internal("credential store lock poisoned"))?;
        Ok(passwords
            .get(credentials.username())
            .is_some_and(|stored| stored.as_str() == credentials.password()))
    }
}

#[async_trait]
impl LoginService for DevLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if !self.password_matches(credentials)? {
            debug!("rejected login attempt");
            return Err(Self::invalid_credentials());
        }
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
            .ok_or_else(Self::invalid_credentials)?;
        Ok(user.id)
    }

    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let user = self
            .users
            .create(registration.user())
            .await
            .map_err(map_user_error)?;
        self.passwords
            .lock()
            .map_err(|_| Error::internal("credential store lock poisoned"))?
            .insert(
                user.username.clone(),
                Zeroizing::new(registration.password().to_owned()),
            );
        info!(user_id = %user.id, "registered user");
        Ok(user)
    }
}
