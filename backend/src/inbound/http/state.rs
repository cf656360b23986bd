//! Shared HTTP adapter state.
//!
//! Handlers receive [`HttpState`] through `web::Data` and depend only on the
//! driving ports, so they can be tested against mocks without storage.

use std::sync::Arc;

use crate::domain::ports::{
    CommentOperations, LoginService, ProjectOperations, TagOperations, TodoOperations,
    UserDirectory,
};

/// Port implementations used by the handlers.
#[derive(Clone)]
pub struct HttpState {
    pub projects: Arc<dyn ProjectOperations>,
    pub tags: Arc<dyn TagOperations>,
    pub todos: Arc<dyn TodoOperations>,
    pub comments: Arc<dyn CommentOperations>,
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserDirectory>,
}
