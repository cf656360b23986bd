//! Domain entities, rules and services.
//!
//! Entities are plain data; persistence lives behind the driven ports in
//! [`ports`]. The membership guard ([`membership`]), cross-entity validator
//! ([`cross_entity`]) and ordering engine ([`ordering`]) are pure functions
//! the services call before committing through a port.

pub mod auth;
pub mod comment;
pub mod comment_service;
pub mod cross_entity;
pub mod error;
pub mod ids;
pub mod membership;
pub mod ordering;
pub mod ports;
pub mod project;
pub mod project_service;
pub(crate) mod service_support;
pub mod tag;
pub mod tag_service;
pub mod todo;
pub mod todo_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, Registration, RegistrationError, RegistrationInput,
};
pub use self::comment::{Comment, CommentText, CommentTextError, NewComment};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ids::{CommentId, ProjectId, TagId, TodoId, UserId};
pub use self::project::{NewProject, Project, ProjectDetail, ProjectName, ProjectNameError};
pub use self::project_service::ProjectService;
pub use self::tag::{NewTag, Tag, TagChanges, TagName, TagNameError};
pub use self::tag_service::TagService;
pub use self::todo::{NewTodo, Priority, Todo, TodoChanges, TodoTitle, TodoTitleError};
pub use self::todo_service::TodoService;
pub use self::trace_id::TraceId;
pub use self::user::{NewUser, User};
