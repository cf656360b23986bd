//! PostgreSQL-backed [`CommentRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use super::error_mapping::{StorageFault, classify, map_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbPool;
use super::schema::{comments, project_members, todos};
use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, NewComment, TodoId, UserId};

/// Diesel implementation of the [`CommentRepository`] port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, AsyncPgConnection>, CommentRepositoryError> {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CommentRepositoryError::connection))
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CommentRepositoryError {
    match classify(error) {
        StorageFault::Connection(message) => CommentRepositoryError::connection(message),
        StorageFault::Query(message) => CommentRepositoryError::query(message),
        StorageFault::UniqueViolation { .. } => CommentRepositoryError::query("unique violation"),
        StorageFault::ForeignKeyViolation { .. } => {
            CommentRepositoryError::query("referenced todo or author does not exist")
        }
    }
}

fn to_comment(row: CommentRow) -> Result<Comment, CommentRepositoryError> {
    Comment::try_from(row).map_err(CommentRepositoryError::query)
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.connection().await?;
        let row: CommentRow = diesel::insert_into(comments::table)
            .values(NewCommentRow {
                todo_id: comment.todo.get(),
                author_id: comment.author.get(),
                text: comment.text.as_ref(),
            })
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_comment(row)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.connection().await?;
        let row: Option<CommentRow> = comments::table
            .find(id.get())
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_comment).transpose()
    }

    async fn list_for_member(
        &self,
        user: UserId,
        todo: Option<TodoId>,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.connection().await?;
        let visible_todos = todos::table
            .filter(
                todos::project_id.eq_any(
                    project_members::table
                        .filter(project_members::user_id.eq(user.get()))
                        .select(project_members::project_id),
                ),
            )
            .select(todos::id);
        let mut query = comments::table
            .filter(comments::todo_id.eq_any(visible_todos))
            .select(CommentRow::as_select())
            .order_by((comments::created_at, comments::id))
            .into_boxed::<diesel::pg::Pg>();
        if let Some(todo) = todo {
            query = query.filter(comments::todo_id.eq(todo.get()));
        }
        let rows: Vec<CommentRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(to_comment).collect()
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError> {
        let mut conn = self.connection().await?;
        let removed = diesel::delete(comments::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
