//! Driving port for project use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Project, ProjectDetail, ProjectId, ProjectName, User, UserId};

/// Request to read a project with its nested collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetailRequest {
    /// Authenticated caller.
    pub actor: UserId,
    /// Target project.
    pub project: ProjectId,
    /// When non-empty, only todos assigned to one of these users are listed.
    pub assignees: Vec<UserId>,
}

/// Request to add users to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteMembersRequest {
    /// Authenticated caller.
    pub actor: UserId,
    /// Target project.
    pub project: ProjectId,
    /// Users to add.
    pub users: Vec<UserId>,
}

/// Request to drop a member from a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveMemberRequest {
    /// Authenticated caller.
    pub actor: UserId,
    /// Target project.
    pub project: ProjectId,
    /// Username of the member to remove.
    pub username: String,
}

/// Project use-cases, each resolving the project through the caller's
/// memberships first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectOperations: Send + Sync {
    /// Create a project owned by `actor`.
    async fn create(&self, actor: UserId, name: ProjectName) -> Result<Project, Error>;

    /// Projects `actor` is a member of.
    async fn list(&self, actor: UserId) -> Result<Vec<Project>, Error>;

    /// Project with members, todos and tags.
    async fn detail(&self, request: ProjectDetailRequest) -> Result<ProjectDetail, Error>;

    /// Delete a project; owner only.
    async fn delete(&self, actor: UserId, project: ProjectId) -> Result<(), Error>;

    /// Add users to the member set and return their records.
    async fn invite_members(&self, request: InviteMembersRequest) -> Result<Vec<User>, Error>;

    /// Remove a member, unassigning them from the project's todos.
    async fn remove_member(&self, request: RemoveMemberRequest) -> Result<User, Error>;
}
