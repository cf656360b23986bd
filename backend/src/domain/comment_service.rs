//! Comment use-cases: membership-gated creation and author-only deletion.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    CommentOperations, CommentRepository, CreateCommentRequest, ProjectRepository, TodoRepository,
};
use crate::domain::service_support::{
    map_comment_error, map_project_error, map_todo_error, unknown_reference,
};
use crate::domain::{Comment, CommentId, Error, NewComment, TodoId, UserId};

/// Comment service implementing [`CommentOperations`].
#[derive(Clone)]
pub struct CommentService<C: ?Sized, T: ?Sized, P: ?Sized> {
    comments: Arc<C>,
    todos: Arc<T>,
    projects: Arc<P>,
}

impl<C, T, P> CommentService<C, T, P> {
    /// Create a new service over the given stores.
    pub fn new(comments: Arc<C>, todos: Arc<T>, projects: Arc<P>) -> Self {
        Self {
            comments,
            todos,
            projects,
        }
    }
}

fn comment_not_found(id: CommentId) -> Error {
    Error::not_found(format!("comment {id} not found"))
}

impl<C, T, P> CommentService<C, T, P>
where
    C: CommentRepository + ?Sized,
    T: TodoRepository + ?Sized,
    P: ProjectRepository + ?Sized,
{
    async fn is_member_of_todo_project(&self, actor: UserId, todo: TodoId) -> Result<bool, Error> {
        let Some(todo) = self.todos.find_by_id(todo).await.map_err(map_todo_error)? else {
            return Ok(false);
        };
        Ok(self
            .projects
            .find_by_id(todo.project)
            .await
            .map_err(map_project_error)?
            .is_some_and(|project| project.is_member(actor)))
    }

    async fn visible_comment(&self, actor: UserId, id: CommentId) -> Result<Comment, Error> {
        let comment = self
            .comments
            .find_by_id(id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| comment_not_found(id))?;
        if self.is_member_of_todo_project(actor, comment.todo).await? {
            Ok(comment)
        } else {
            Err(comment_not_found(id))
        }
    }
}

#[async_trait]
impl<C, T, P> CommentOperations for CommentService<C, T, P>
where
    C: CommentRepository + ?Sized,
    T: TodoRepository + ?Sized,
    P: ProjectRepository + ?Sized,
{
    async fn create(&self, request: CreateCommentRequest) -> Result<Comment, Error> {
        let todo = self
            .todos
            .find_by_id(request.todo)
            .await
            .map_err(map_todo_error)?
            .ok_or_else(|| unknown_reference("todo", request.todo))?;
        let is_member = self
            .projects
            .find_by_id(todo.project)
            .await
            .map_err(map_project_error)?
            .is_some_and(|project| project.is_member(request.actor));
        if !is_member {
            return Err(Error::invalid_request("Must be a member of the project!")
                .with_details(json!({"field": "todo", "code": "not_a_member"})));
        }

        let comment = NewComment {
            todo: todo.id,
            author: request.actor,
            text: request.text,
        };
        self.comments
            .create(&comment)
            .await
            .map_err(map_comment_error)
    }

    async fn list(&self, actor: UserId, todo: Option<TodoId>) -> Result<Vec<Comment>, Error> {
        self.comments
            .list_for_member(actor, todo)
            .await
            .map_err(map_comment_error)
    }

    async fn get(&self, actor: UserId, id: CommentId) -> Result<Comment, Error> {
        self.visible_comment(actor, id).await
    }

    async fn delete(&self, actor: UserId, id: CommentId) -> Result<(), Error> {
        let comment = self.visible_comment(actor, id).await?;
        if comment.author != actor {
            return Err(Error::invalid_request("Only the author can delete a comment."));
        }
        if self.comments.delete(id).await.map_err(map_comment_error)? {
            Ok(())
        } else {
            Err(comment_not_found(id))
        }
    }
}
