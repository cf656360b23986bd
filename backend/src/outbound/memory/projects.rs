//! [`ProjectRepository`] for the in-memory store.

use std::collections::BTreeSet;

use async_trait::async_trait;

use super::InMemoryStore;
use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{NewProject, Project, ProjectId, UserId};

fn missing(id: ProjectId) -> ProjectRepositoryError {
    ProjectRepositoryError::query(format!("project {id} does not exist"))
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let now = self.now();
        let mut state = self.lock().map_err(ProjectRepositoryError::query)?;
        if !state.users.contains_key(&project.owner) {
            return Err(ProjectRepositoryError::query(format!(
                "owner {} does not exist",
                project.owner
            )));
        }
        let id = ProjectId::new(state.next_id());
        let created = Project {
            id,
            name: project.name.clone(),
            owner: project.owner,
            members: BTreeSet::from([project.owner]),
            created_at: now,
            updated_at: now,
        };
        state.projects.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let state = self.lock().map_err(ProjectRepositoryError::query)?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn list_for_member(&self, user: UserId) -> Result<Vec<Project>, ProjectRepositoryError> {
        let state = self.lock().map_err(ProjectRepositoryError::query)?;
        Ok(state
            .projects
            .values()
            .filter(|project| project.is_member(user))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, ProjectRepositoryError> {
        let mut state = self.lock().map_err(ProjectRepositoryError::query)?;
        if state.projects.remove(&id).is_none() {
            return Ok(false);
        }
        let doomed: Vec<_> = state
            .todos
            .values()
            .filter(|todo| todo.project == id)
            .map(|todo| todo.id)
            .collect();
        for todo in doomed {
            state.remove_todo(todo);
        }
        state.tags.retain(|_, tag| tag.project != id);
        Ok(true)
    }

    async fn add_members(
        &self,
        id: ProjectId,
        users: &[UserId],
    ) -> Result<(), ProjectRepositoryError> {
        let mut state = self.lock().map_err(ProjectRepositoryError::query)?;
        if let Some(unknown) = users.iter().find(|user| !state.users.contains_key(*user)) {
            return Err(ProjectRepositoryError::query(format!(
                "user {unknown} does not exist"
            )));
        }
        let project = state.projects.get_mut(&id).ok_or_else(|| missing(id))?;
        project.members.extend(users.iter().copied());
        Ok(())
    }

    async fn remove_member(
        &self,
        id: ProjectId,
        user: UserId,
    ) -> Result<(), ProjectRepositoryError> {
        let mut state = self.lock().map_err(ProjectRepositoryError::query)?;
        let project = state.projects.get_mut(&id).ok_or_else(|| missing(id))?;
        project.members.remove(&user);
        for todo in state.todos.values_mut().filter(|todo| todo.project == id) {
            todo.assignees.remove(&user);
        }
        Ok(())
    }
}
