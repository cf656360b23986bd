//! Session access for handlers.
//!
//! [`SessionContext`] wraps the Actix session so handlers only persist, read
//! or drop the authenticated user's id.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype exposing the session operations handlers need.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated user's id and rotate the session cookie.
    pub fn persist_user(&self, user: UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
        self.0.renew();
        Ok(())
    }

    /// Current user id, if the cookie carries a readable one.
    pub fn user_id(&self) -> Option<UserId> {
        match self.0.get::<i64>(USER_ID_KEY) {
            Ok(raw) => raw.map(UserId::new),
            Err(error) => {
                warn!(%error, "discarding unreadable user id in session cookie");
                None
            }
        }
    }

    /// Require an authenticated user or fail with `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every session entry and expire the cookie.
    pub fn end(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
