//! PostgreSQL entity store built on Diesel, `diesel-async` and bb8.
//!
//! One repository per aggregate implements the matching driven port. Row
//! structs (`models`) and table definitions (`schema`) stay private to this
//! module; repositories only translate between rows and domain entities.
//! Every multi-row mutation runs in a single transaction.
//!
//! ```ignore
//! use taskboard::outbound::persistence::{DbPool, DieselProjectRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/taskboard")).await?;
//! let projects = DieselProjectRepository::new(pool.clone());
//! ```

mod diesel_comment_repository;
mod diesel_project_repository;
mod diesel_tag_repository;
mod diesel_todo_repository;
mod diesel_user_directory;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use diesel_todo_repository::DieselTodoRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
