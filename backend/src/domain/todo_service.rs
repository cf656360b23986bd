//! Todo use-cases and bulk reordering.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::cross_entity;
use crate::domain::ordering::ReorderPlan;
use crate::domain::ports::{ProjectRepository, TagRepository, TodoOperations, TodoRepository};
use crate::domain::service_support::{
    cross_entity_error, invalid_ordering, map_project_error, map_tag_error, map_todo_error,
    referenced_project, unknown_reference,
};
use crate::domain::{Error, NewTodo, Project, TagId, Todo, TodoChanges, TodoId, UserId};

/// Todo service implementing [`TodoOperations`].
#[derive(Clone)]
pub struct TodoService<T: ?Sized, P: ?Sized, G: ?Sized> {
    todos: Arc<T>,
    projects: Arc<P>,
    tags: Arc<G>,
}

impl<T, P, G> TodoService<T, P, G> {
    /// Create a new service over the given stores.
    pub fn new(todos: Arc<T>, projects: Arc<P>, tags: Arc<G>) -> Self {
        Self {
            todos,
            projects,
            tags,
        }
    }
}

fn todo_not_found(id: TodoId) -> Error {
    Error::not_found(format!("todo {id} not found"))
}

impl<T, P, G> TodoService<T, P, G>
where
    T: TodoRepository + ?Sized,
    P: ProjectRepository + ?Sized,
    G: TagRepository + ?Sized,
{
    /// Resolve a todo and its project through the actor's memberships.
    async fn visible_todo(&self, actor: UserId, id: TodoId) -> Result<(Todo, Project), Error> {
        let todo = self
            .todos
            .find_by_id(id)
            .await
            .map_err(map_todo_error)?
            .ok_or_else(|| todo_not_found(id))?;
        let project = self
            .projects
            .find_by_id(todo.project)
            .await
            .map_err(map_project_error)?
            .filter(|project| project.is_member(actor))
            .ok_or_else(|| todo_not_found(id))?;
        Ok((todo, project))
    }

    /// Every tag must exist and belong to `project`.
    async fn check_tags(&self, project: &Project, ids: &BTreeSet<TagId>) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }
        let wanted: Vec<TagId> = ids.iter().copied().collect();
        let found = self.tags.find_many(&wanted).await.map_err(map_tag_error)?;
        if let Some(missing) = wanted
            .iter()
            .find(|id| !found.iter().any(|tag| tag.id == **id))
        {
            return Err(unknown_reference("tags", missing));
        }
        cross_entity::validate_tags(project, &found).map_err(cross_entity_error)
    }
}

#[async_trait]
impl<T, P, G> TodoOperations for TodoService<T, P, G>
where
    T: TodoRepository + ?Sized,
    P: ProjectRepository + ?Sized,
    G: TagRepository + ?Sized,
{
    async fn create(&self, actor: UserId, todo: NewTodo) -> Result<Todo, Error> {
        let project = referenced_project(&*self.projects, todo.project).await?;
        cross_entity::validate_creator(&project, actor).map_err(cross_entity_error)?;
        self.check_tags(&project, &todo.tags).await?;
        cross_entity::validate_assignees(&project, &todo.assignees)
            .map_err(cross_entity_error)?;
        self.todos.create(&todo).await.map_err(map_todo_error)
    }

    async fn list(&self, actor: UserId) -> Result<Vec<Todo>, Error> {
        self.todos
            .list_for_member(actor)
            .await
            .map_err(map_todo_error)
    }

    async fn get(&self, actor: UserId, id: TodoId) -> Result<Todo, Error> {
        self.visible_todo(actor, id).await.map(|(todo, _)| todo)
    }

    async fn update(
        &self,
        actor: UserId,
        id: TodoId,
        changes: TodoChanges,
    ) -> Result<Todo, Error> {
        let (todo, project) = self.visible_todo(actor, id).await?;
        if changes.project.is_some_and(|requested| requested != todo.project) {
            return Err(Error::invalid_request("project cannot be changed")
                .with_details(json!({"field": "project", "code": "immutable"})));
        }
        // Only relations present in the patch are re-validated, always against
        // the todo's existing project.
        if let Some(tags) = &changes.tags {
            self.check_tags(&project, tags).await?;
        }
        if let Some(assignees) = &changes.assignees {
            cross_entity::validate_assignees(&project, assignees).map_err(cross_entity_error)?;
        }
        self.todos
            .update(id, &changes)
            .await
            .map_err(map_todo_error)?
            .ok_or_else(|| todo_not_found(id))
    }

    async fn delete(&self, actor: UserId, id: TodoId) -> Result<(), Error> {
        self.visible_todo(actor, id).await?;
        if self.todos.delete(id).await.map_err(map_todo_error)? {
            Ok(())
        } else {
            Err(todo_not_found(id))
        }
    }

    // TODO: require membership of every affected project once clients are
    // known to send only their own todos.
    async fn reorder(&self, _actor: UserId, ids: Vec<TodoId>) -> Result<(), Error> {
        let plan = ReorderPlan::from_sequence(ids).map_err(|_| invalid_ordering())?;
        if plan.is_empty() {
            return Ok(());
        }
        self.todos.reorder(&plan).await.map_err(map_todo_error)
    }
}

#[cfg(test)]
#[path = "todo_service_tests.rs"]
mod tests;
