//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Operations`, [`LoginService`]) are called by inbound
//! adapters. Driven ports (`*Repository`, [`UserDirectory`]) are implemented
//! by the PostgreSQL and in-memory stores.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_operations;
mod comment_repository;
mod login_service;
mod project_operations;
mod project_repository;
mod tag_operations;
mod tag_repository;
mod todo_operations;
mod todo_repository;
mod user_directory;

#[cfg(test)]
pub use comment_operations::MockCommentOperations;
pub use comment_operations::{CommentOperations, CreateCommentRequest};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use project_operations::MockProjectOperations;
pub use project_operations::{
    InviteMembersRequest, ProjectDetailRequest, ProjectOperations, RemoveMemberRequest,
};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use tag_operations::MockTagOperations;
pub use tag_operations::TagOperations;
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{TagRepository, TagRepositoryError};
#[cfg(test)]
pub use todo_operations::MockTodoOperations;
pub use todo_operations::TodoOperations;
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
pub use todo_repository::{TodoRepository, TodoRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
