//! [`TagRepository`] for the in-memory store.

use async_trait::async_trait;

use super::InMemoryStore;
use super::state::State;
use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{NewTag, ProjectId, Tag, TagChanges, TagId, TagName, UserId};

fn ensure_unique(
    state: &State,
    name: &TagName,
    project: ProjectId,
    except: Option<TagId>,
) -> Result<(), TagRepositoryError> {
    let clash = state
        .tags
        .values()
        .any(|tag| Some(tag.id) != except && tag.project == project && tag.name == *name);
    if clash {
        Err(TagRepositoryError::duplicate(name.as_ref()))
    } else {
        Ok(())
    }
}

fn ensure_project(state: &State, project: ProjectId) -> Result<(), TagRepositoryError> {
    if state.projects.contains_key(&project) {
        Ok(())
    } else {
        Err(TagRepositoryError::query(format!(
            "project {project} does not exist"
        )))
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn create(&self, tag: &NewTag) -> Result<Tag, TagRepositoryError> {
        let now = self.now();
        let mut state = self.lock().map_err(TagRepositoryError::query)?;
        ensure_project(&state, tag.project)?;
        ensure_unique(&state, &tag.name, tag.project, None)?;
        let id = TagId::new(state.next_id());
        let created = Tag {
            id,
            name: tag.name.clone(),
            project: tag.project,
            created_at: now,
            updated_at: now,
        };
        state.tags.insert(id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: TagId,
        changes: &TagChanges,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let now = self.now();
        let mut state = self.lock().map_err(TagRepositoryError::query)?;
        let Some(current) = state.tags.get(&id).cloned() else {
            return Ok(None);
        };
        let name = changes.name.clone().unwrap_or(current.name);
        let project = changes.project.unwrap_or(current.project);
        ensure_project(&state, project)?;
        ensure_unique(&state, &name, project, Some(id))?;

        let updated = Tag {
            name,
            project,
            updated_at: now,
            ..current
        };
        if updated.project != current.project {
            // A tag moved away can no longer label the old project's todos.
            for todo in state.todos.values_mut() {
                todo.tags.remove(&id);
            }
        }
        state.tags.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, TagRepositoryError> {
        let state = self.lock().map_err(TagRepositoryError::query)?;
        Ok(state.tags.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagRepositoryError> {
        let state = self.lock().map_err(TagRepositoryError::query)?;
        Ok(ids
            .iter()
            .copied()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| state.tags.get(&id).cloned())
            .collect())
    }

    async fn list_for_member(&self, user: UserId) -> Result<Vec<Tag>, TagRepositoryError> {
        let state = self.lock().map_err(TagRepositoryError::query)?;
        Ok(state
            .tags
            .values()
            .filter(|tag| state.is_member(tag.project, user))
            .cloned()
            .collect())
    }

    async fn list_by_project(&self, project: ProjectId) -> Result<Vec<Tag>, TagRepositoryError> {
        let state = self.lock().map_err(TagRepositoryError::query)?;
        Ok(state
            .tags
            .values()
            .filter(|tag| tag.project == project)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: TagId) -> Result<bool, TagRepositoryError> {
        let mut state = self.lock().map_err(TagRepositoryError::query)?;
        if state.tags.remove(&id).is_none() {
            return Ok(false);
        }
        for todo in state.todos.values_mut() {
            todo.tags.remove(&id);
        }
        Ok(true)
    }
}
