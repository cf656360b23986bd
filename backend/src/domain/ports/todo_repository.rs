//! Driven port for todo persistence and ordering.

use async_trait::async_trait;

use crate::domain::ordering::ReorderPlan;
use crate::domain::{NewTodo, ProjectId, Todo, TodoChanges, TodoId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by todo repository adapters.
    pub enum TodoRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "todo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "todo repository query failed: {message}",
        /// A reorder referenced a todo that does not exist.
        UnknownTodo { id: TodoId } => "todo {id} does not exist",
        /// An assignee stopped being a member before the write committed.
        NonMemberAssignee { user: UserId } => "user {user} is not a member of the todo's project",
    }
}

/// Storage for todos with their tag and assignee sets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a todo appended after the highest order in its project.
    ///
    /// Reading the current maximum and inserting happen in one transaction.
    /// Assignees are checked against the project's members inside that
    /// transaction.
    async fn create(&self, todo: &NewTodo) -> Result<Todo, TodoRepositoryError>;

    /// Fetch a single todo.
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoRepositoryError>;

    /// Todos of every project the user is a member of, by order then id.
    async fn list_for_member(&self, user: UserId) -> Result<Vec<Todo>, TodoRepositoryError>;

    /// Todos of one project.
    ///
    /// With an empty `assignees` slice every todo is returned by order then
    /// id. Otherwise only todos assigned to at least one listed user are
    /// returned, once each, ordered by id.
    async fn list_by_project(
        &self,
        project: ProjectId,
        assignees: &[UserId],
    ) -> Result<Vec<Todo>, TodoRepositoryError>;

    /// Apply a partial update. Returns `None` when the todo does not exist.
    ///
    /// Supplied assignees are re-checked against the members in the same
    /// transaction, failing with [`TodoRepositoryError::NonMemberAssignee`].
    async fn update(
        &self,
        id: TodoId,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, TodoRepositoryError>;

    /// Delete a todo with its comments. Returns `false` when missing.
    async fn delete(&self, id: TodoId) -> Result<bool, TodoRepositoryError>;

    /// Apply a reorder plan atomically.
    ///
    /// Fails with [`TodoRepositoryError::UnknownTodo`] and changes nothing if
    /// any id is missing. Todos outside the plan are never touched.
    async fn reorder(&self, plan: &ReorderPlan) -> Result<(), TodoRepositoryError>;
}
