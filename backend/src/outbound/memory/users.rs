//! [`UserDirectory`] for the in-memory store.

use async_trait::async_trait;

use super::InMemoryStore;
use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{NewUser, User, UserId};

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserDirectoryError> {
        let state = self.lock().map_err(UserDirectoryError::query)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserDirectoryError> {
        let state = self.lock().map_err(UserDirectoryError::query)?;
        Ok(state
            .users
            .values()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserDirectoryError> {
        let state = self.lock().map_err(UserDirectoryError::query)?;
        Ok(state
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserDirectoryError> {
        let mut state = self.lock().map_err(UserDirectoryError::query)?;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(UserDirectoryError::duplicate_username(user.username.as_str()));
        }
        let id = UserId::new(state.next_id());
        let created = user.clone().into_user(id);
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserDirectoryError> {
        let mut state = self.lock().map_err(UserDirectoryError::query)?;
        if !state.users.contains_key(&id) {
            return Ok(false);
        }
        let owns_project = state.projects.values().any(|p| p.owner == id);
        let authored = state.comments.values().any(|c| c.author == id);
        if owns_project || authored {
            return Err(UserDirectoryError::protected(id));
        }
        for project in state.projects.values_mut() {
            project.members.remove(&id);
        }
        for todo in state.todos.values_mut() {
            todo.assignees.remove(&id);
        }
        state.users.remove(&id);
        Ok(true)
    }
}
