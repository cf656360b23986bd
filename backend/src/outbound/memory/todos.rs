//! [`TodoRepository`] for the in-memory store.

use std::collections::BTreeSet;

use async_trait::async_trait;

use super::InMemoryStore;
use super::state::State;
use crate::domain::ordering::{ReorderPlan, next_order};
use crate::domain::ports::{TodoRepository, TodoRepositoryError};
use crate::domain::{NewTodo, ProjectId, Todo, TodoChanges, TodoId, UserId};

fn by_position(todos: &mut [Todo]) {
    todos.sort_by_key(|todo| (todo.order, todo.id));
}

/// Assignees must still be members when the write lands.
fn ensure_members(
    state: &State,
    project: ProjectId,
    assignees: &BTreeSet<UserId>,
) -> Result<(), TodoRepositoryError> {
    match assignees.iter().find(|user| !state.is_member(project, **user)) {
        Some(user) => Err(TodoRepositoryError::non_member_assignee(*user)),
        None => Ok(()),
    }
}

#[async_trait]
impl TodoRepository for InMemoryStore {
    async fn create(&self, todo: &NewTodo) -> Result<Todo, TodoRepositoryError> {
        let now = self.now();
        let mut state = self.lock().map_err(TodoRepositoryError::query)?;
        if !state.projects.contains_key(&todo.project) {
            return Err(TodoRepositoryError::query(format!(
                "project {} does not exist",
                todo.project
            )));
        }
        ensure_members(&state, todo.project, &todo.assignees)?;
        let current_max = state
            .todos
            .values()
            .filter(|existing| existing.project == todo.project)
            .map(|existing| existing.order)
            .max();
        let id = TodoId::new(state.next_id());
        let created = Todo {
            id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            priority: todo.priority,
            tags: todo.tags.clone(),
            assignees: todo.assignees.clone(),
            project: todo.project,
            order: next_order(current_max),
            created_at: now,
            updated_at: now,
        };
        state.todos.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoRepositoryError> {
        let state = self.lock().map_err(TodoRepositoryError::query)?;
        Ok(state.todos.get(&id).cloned())
    }

    async fn list_for_member(&self, user: UserId) -> Result<Vec<Todo>, TodoRepositoryError> {
        let state = self.lock().map_err(TodoRepositoryError::query)?;
        let mut todos: Vec<Todo> = state
            .todos
            .values()
            .filter(|todo| state.is_member(todo.project, user))
            .cloned()
            .collect();
        by_position(&mut todos);
        Ok(todos)
    }

    async fn list_by_project(
        &self,
        project: ProjectId,
        assignees: &[UserId],
    ) -> Result<Vec<Todo>, TodoRepositoryError> {
        let state = self.lock().map_err(TodoRepositoryError::query)?;
        let in_project = state.todos.values().filter(|todo| todo.project == project);
        if assignees.is_empty() {
            let mut todos: Vec<Todo> = in_project.cloned().collect();
            by_position(&mut todos);
            return Ok(todos);
        }
        // BTreeMap iteration is already ordered by id and yields each todo once.
        Ok(in_project
            .filter(|todo| assignees.iter().any(|user| todo.assignees.contains(user)))
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: TodoId,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, TodoRepositoryError> {
        let now = self.now();
        let mut state = self.lock().map_err(TodoRepositoryError::query)?;
        let Some(project) = state.todos.get(&id).map(|todo| todo.project) else {
            return Ok(None);
        };
        if let Some(assignees) = &changes.assignees {
            ensure_members(&state, project, assignees)?;
        }
        let Some(todo) = state.todos.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(todo);
        todo.updated_at = now;
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: TodoId) -> Result<bool, TodoRepositoryError> {
        let mut state = self.lock().map_err(TodoRepositoryError::query)?;
        Ok(state.remove_todo(id))
    }

    async fn reorder(&self, plan: &ReorderPlan) -> Result<(), TodoRepositoryError> {
        let mut state = self.lock().map_err(TodoRepositoryError::query)?;
        if let Some(missing) = plan.ids().iter().find(|id| !state.todos.contains_key(*id)) {
            return Err(TodoRepositoryError::unknown_todo(*missing));
        }
        for (id, order) in plan.assignments() {
            if let Some(todo) = state.todos.get_mut(&id) {
                todo.order = order;
            }
        }
        Ok(())
    }
}
