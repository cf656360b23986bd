//! Driving port for tag use-cases.

use async_trait::async_trait;

use crate::domain::{Error, NewTag, Tag, TagChanges, TagId, UserId};

/// Tag use-cases scoped to the caller's projects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagOperations: Send + Sync {
    /// Create a tag in a project `actor` belongs to.
    async fn create(&self, actor: UserId, tag: NewTag) -> Result<Tag, Error>;

    /// Tags visible to `actor`.
    async fn list(&self, actor: UserId) -> Result<Vec<Tag>, Error>;

    /// One visible tag.
    async fn get(&self, actor: UserId, id: TagId) -> Result<Tag, Error>;

    /// Rename or re-parent a visible tag.
    async fn update(&self, actor: UserId, id: TagId, changes: TagChanges) -> Result<Tag, Error>;

    /// Delete a visible tag.
    async fn delete(&self, actor: UserId, id: TagId) -> Result<(), Error>;
}
