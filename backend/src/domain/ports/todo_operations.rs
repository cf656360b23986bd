//! Driving port for todo use-cases, including bulk reordering.

use async_trait::async_trait;

use crate::domain::{Error, NewTodo, Todo, TodoChanges, TodoId, UserId};

/// Todo use-cases scoped to the caller's projects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoOperations: Send + Sync {
    /// Create a todo after validating membership, tags and assignees.
    async fn create(&self, actor: UserId, todo: NewTodo) -> Result<Todo, Error>;

    /// Todos visible to `actor`.
    async fn list(&self, actor: UserId) -> Result<Vec<Todo>, Error>;

    /// One visible todo.
    async fn get(&self, actor: UserId, id: TodoId) -> Result<Todo, Error>;

    /// Partially update a visible todo, re-validating supplied relations.
    async fn update(&self, actor: UserId, id: TodoId, changes: TodoChanges)
    -> Result<Todo, Error>;

    /// Delete a visible todo.
    async fn delete(&self, actor: UserId, id: TodoId) -> Result<(), Error>;

    /// Renumber the listed todos to `0..N-1` in the given order, atomically.
    async fn reorder(&self, actor: UserId, ids: Vec<TodoId>) -> Result<(), Error>;
}
