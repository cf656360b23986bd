//! Driven port for project persistence.

use async_trait::async_trait;

use crate::domain::{NewProject, Project, ProjectId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "project repository query failed: {message}",
    }
}

/// Storage for projects and their member sets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a project and add its owner as first member, atomically.
    async fn create(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError>;

    /// Fetch a project with its member set.
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Projects the user is a member of, ordered by id.
    async fn list_for_member(&self, user: UserId) -> Result<Vec<Project>, ProjectRepositoryError>;

    /// Delete a project together with its tags, todos and their comments in
    /// one transaction. Returns `false` when the project does not exist.
    async fn delete(&self, id: ProjectId) -> Result<bool, ProjectRepositoryError>;

    /// Add users to the member set; existing members are left alone.
    async fn add_members(
        &self,
        id: ProjectId,
        users: &[UserId],
    ) -> Result<(), ProjectRepositoryError>;

    /// Remove a member and unassign them from every todo of the project, in
    /// one transaction.
    async fn remove_member(&self, id: ProjectId, user: UserId)
    -> Result<(), ProjectRepositoryError>;
}
