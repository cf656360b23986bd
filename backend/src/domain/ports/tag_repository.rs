//! Driven port for tag persistence.

use async_trait::async_trait;

use crate::domain::{NewTag, ProjectId, Tag, TagChanges, TagId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "tag repository query failed: {message}",
        /// A tag with the same name already exists in the project.
        Duplicate { name: String } => "tag {name} already exists in the project",
    }
}

/// Storage for tags. `(name, project)` is unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Insert a tag.
    async fn create(&self, tag: &NewTag) -> Result<Tag, TagRepositoryError>;

    /// Apply a partial update. Returns `None` when the tag does not exist.
    async fn update(&self, id: TagId, changes: &TagChanges)
    -> Result<Option<Tag>, TagRepositoryError>;

    /// Fetch a single tag.
    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, TagRepositoryError>;

    /// Fetch every listed tag that exists, ordered by id.
    async fn find_many(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagRepositoryError>;

    /// Tags of every project the user is a member of, ordered by id.
    async fn list_for_member(&self, user: UserId) -> Result<Vec<Tag>, TagRepositoryError>;

    /// Tags of one project, ordered by id.
    async fn list_by_project(&self, project: ProjectId) -> Result<Vec<Tag>, TagRepositoryError>;

    /// Delete a tag, detaching it from todos. Returns `false` when missing.
    async fn delete(&self, id: TagId) -> Result<bool, TagRepositoryError>;
}
