//! [`CommentRepository`] for the in-memory store.

use async_trait::async_trait;

use super::InMemoryStore;
use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, NewComment, TodoId, UserId};

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let now = self.now();
        let mut state = self.lock().map_err(CommentRepositoryError::query)?;
        if !state.todos.contains_key(&comment.todo) {
            return Err(CommentRepositoryError::query(format!(
                "todo {} does not exist",
                comment.todo
            )));
        }
        let id = CommentId::new(state.next_id());
        let created = Comment {
            id,
            todo: comment.todo,
            author: comment.author,
            text: comment.text.clone(),
            created_at: now,
            updated_at: now,
        };
        state.comments.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let state = self.lock().map_err(CommentRepositoryError::query)?;
        Ok(state.comments.get(&id).cloned())
    }

    async fn list_for_member(
        &self,
        user: UserId,
        todo: Option<TodoId>,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let state = self.lock().map_err(CommentRepositoryError::query)?;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| todo.is_none_or(|wanted| comment.todo == wanted))
            .filter(|comment| {
                state
                    .todos
                    .get(&comment.todo)
                    .is_some_and(|todo| state.is_member(todo.project, user))
            })
            .cloned()
            .collect();
        comments.sort_by_key(|comment| (comment.created_at, comment.id));
        Ok(comments)
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError> {
        let mut state = self.lock().map_err(CommentRepositoryError::query)?;
        Ok(state.comments.remove(&id).is_some())
    }
}
