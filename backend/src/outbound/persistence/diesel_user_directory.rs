//! PostgreSQL-backed [`UserDirectory`].
//!
//! Deleting a user is refused while they own a project or have written a
//! comment. The check runs inside the delete transaction; the `RESTRICT`
//! foreign keys back it up if a concurrent insert slips past.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use super::error_mapping::{StorageFault, TxError, classify, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::{comments, projects, users};
use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{NewUser, User, UserId};

/// Diesel implementation of the [`UserDirectory`] port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_fault(fault: StorageFault) -> UserDirectoryError {
    match fault {
        StorageFault::Connection(message) => UserDirectoryError::connection(message),
        StorageFault::Query(message) => UserDirectoryError::query(message),
        StorageFault::UniqueViolation { .. } => UserDirectoryError::query("unique violation"),
        StorageFault::ForeignKeyViolation { .. } => {
            UserDirectoryError::query("foreign key violation")
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    map_fault(classify(error))
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(User::from))
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserDirectoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(raw))
            .order_by(users::id)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(User::from))
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        let row = NewUserRow {
            username: &user.username,
            email: &user.email,
            first_name: &user.first_name,
            last_name: &user.last_name,
        };
        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match classify(err) {
                StorageFault::UniqueViolation { .. } => {
                    UserDirectoryError::duplicate_username(user.username.as_str())
                }
                other => map_fault(other),
            })?;
        Ok(User::from(inserted))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        let raw = id.get();
        let outcome: Result<bool, TxError<UserDirectoryError>> = conn
            .transaction(|conn| {
                async move {
                    let owns_project: bool = diesel::select(diesel::dsl::exists(
                        projects::table.filter(projects::owner_id.eq(raw)),
                    ))
                    .get_result(conn)
                    .await?;
                    let authored: bool = diesel::select(diesel::dsl::exists(
                        comments::table.filter(comments::author_id.eq(raw)),
                    ))
                    .get_result(conn)
                    .await?;
                    if owns_project || authored {
                        return Err(TxError::Abort(UserDirectoryError::protected(id)));
                    }
                    // Memberships and assignments cascade with the user row.
                    let removed = diesel::delete(users::table.find(raw)).execute(conn).await?;
                    Ok(removed > 0)
                }
                .scope_boxed()
            })
            .await;
        outcome.map_err(|err| {
            err.resolve(|diesel_err| match classify(diesel_err) {
                StorageFault::ForeignKeyViolation { .. } => UserDirectoryError::protected(id),
                other => map_fault(other),
            })
        })
    }
}
