//! PostgreSQL-backed [`TagRepository`].
//!
//! Name clashes are left to the `tags_project_name_unique` constraint and
//! translated into [`TagRepositoryError::Duplicate`].

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use super::error_mapping::{StorageFault, TxError, classify, map_pool_error};
use super::models::{NewTagRow, TagRow, TagUpdate};
use super::pool::DbPool;
use super::schema::{project_members, tags, todo_tags};
use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{NewTag, ProjectId, Tag, TagChanges, TagId, UserId};

const UNIQUE_NAME_CONSTRAINT: &str = "tags_project_name_unique";

/// Diesel implementation of the [`TagRepository`] port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, AsyncPgConnection>, TagRepositoryError> {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TagRepositoryError::connection))
    }
}

/// Translate a storage failure; `name` is reported on a uniqueness clash.
fn map_write_error(error: diesel::result::Error, name: &str) -> TagRepositoryError {
    match classify(error) {
        StorageFault::UniqueViolation { constraint }
            if constraint.as_deref().is_none_or(|c| c == UNIQUE_NAME_CONSTRAINT) =>
        {
            TagRepositoryError::duplicate(name)
        }
        fault => map_fault(fault),
    }
}

fn map_fault(fault: StorageFault) -> TagRepositoryError {
    match fault {
        StorageFault::Connection(message) => TagRepositoryError::connection(message),
        StorageFault::Query(message) => TagRepositoryError::query(message),
        StorageFault::UniqueViolation { .. } => TagRepositoryError::query("unique violation"),
        StorageFault::ForeignKeyViolation { .. } => {
            TagRepositoryError::query("referenced project does not exist")
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> TagRepositoryError {
    map_fault(classify(error))
}

fn to_tags(rows: Vec<TagRow>) -> Result<Vec<Tag>, TagRepositoryError> {
    rows.into_iter()
        .map(|row| Tag::try_from(row).map_err(TagRepositoryError::query))
        .collect()
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn create(&self, tag: &NewTag) -> Result<Tag, TagRepositoryError> {
        let mut conn = self.connection().await?;
        let row: TagRow = diesel::insert_into(tags::table)
            .values(NewTagRow {
                name: tag.name.as_ref(),
                project_id: tag.project.get(),
            })
            .returning(TagRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, tag.name.as_ref()))?;
        Tag::try_from(row).map_err(TagRepositoryError::query)
    }

    async fn update(
        &self,
        id: TagId,
        changes: &TagChanges,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let raw = id.get();
        let mut conn = self.connection().await?;
        let outcome: Result<Option<TagRow>, TxError<TagRepositoryError>> = conn
            .transaction(|conn| {
                async move {
                    let current: Option<TagRow> = tags::table
                        .find(raw)
                        .select(TagRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(current) = current else {
                        return Ok(None);
                    };
                    let name = changes
                        .name
                        .as_ref()
                        .map_or(current.name.as_str(), AsRef::as_ref);
                    let changeset = TagUpdate {
                        name: changes.name.as_ref().map(AsRef::as_ref),
                        project_id: changes.project.map(ProjectId::get),
                    };
                    let updated: TagRow = diesel::update(tags::table.find(raw))
                        .set((changeset, tags::updated_at.eq(now)))
                        .returning(TagRow::as_returning())
                        .get_result(conn)
                        .await
                        .map_err(|err| TxError::Abort(map_write_error(err, name)))?;
                    if updated.project_id != current.project_id {
                        // A tag moved away can no longer label the old project's todos.
                        diesel::delete(todo_tags::table.filter(todo_tags::tag_id.eq(raw)))
                            .execute(conn)
                            .await?;
                    }
                    Ok(Some(updated))
                }
                .scope_boxed()
            })
            .await;
        outcome
            .map_err(|err| err.resolve(map_diesel_error))?
            .map(|row| Tag::try_from(row).map_err(TagRepositoryError::query))
            .transpose()
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.connection().await?;
        let row: Option<TagRow> = tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| Tag::try_from(row).map_err(TagRepositoryError::query))
            .transpose()
    }

    async fn find_many(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.connection().await?;
        let rows: Vec<TagRow> = tags::table
            .filter(tags::id.eq_any(raw))
            .order_by(tags::id)
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_tags(rows)
    }

    async fn list_for_member(&self, user: UserId) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<TagRow> = tags::table
            .filter(
                tags::project_id.eq_any(
                    project_members::table
                        .filter(project_members::user_id.eq(user.get()))
                        .select(project_members::project_id),
                ),
            )
            .order_by(tags::id)
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_tags(rows)
    }

    async fn list_by_project(&self, project: ProjectId) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<TagRow> = tags::table
            .filter(tags::project_id.eq(project.get()))
            .order_by(tags::id)
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_tags(rows)
    }

    async fn delete(&self, id: TagId) -> Result<bool, TagRepositoryError> {
        let mut conn = self.connection().await?;
        // Labels go with the tag through the `todo_tags` cascade.
        let removed = diesel::delete(tags::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
