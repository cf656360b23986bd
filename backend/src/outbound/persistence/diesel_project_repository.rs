//! PostgreSQL-backed [`ProjectRepository`].
//!
//! Creating a project inserts the owner's membership row in the same
//! transaction. Deleting one removes its comments, todos, tags and
//! memberships explicitly before the project row.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use super::error_mapping::{StorageFault, TxError, classify, map_pool_error};
use super::models::{MemberRow, NewProjectRow, ProjectRow};
use super::pool::DbPool;
use super::schema::{
    comments, project_members, projects, tags, todo_assignees, todo_tags, todos, users,
};
use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{NewProject, Project, ProjectId, UserId};

/// Diesel implementation of the [`ProjectRepository`] port.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, AsyncPgConnection>,
        ProjectRepositoryError,
    > {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProjectRepositoryError::connection))
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ProjectRepositoryError {
    match classify(error) {
        StorageFault::Connection(message) => ProjectRepositoryError::connection(message),
        StorageFault::Query(message) => ProjectRepositoryError::query(message),
        StorageFault::UniqueViolation { .. } => ProjectRepositoryError::query("unique violation"),
        StorageFault::ForeignKeyViolation { .. } => {
            ProjectRepositoryError::query("referenced row does not exist")
        }
    }
}

fn missing(id: i64) -> ProjectRepositoryError {
    ProjectRepositoryError::query(format!("project {id} does not exist"))
}

/// Member sets keyed by project id.
async fn load_members(
    conn: &mut AsyncPgConnection,
    project_ids: &[i64],
) -> QueryResult<HashMap<i64, BTreeSet<UserId>>> {
    let rows: Vec<MemberRow> = project_members::table
        .filter(project_members::project_id.eq_any(project_ids))
        .select(MemberRow::as_select())
        .load(conn)
        .await?;
    let mut members: HashMap<i64, BTreeSet<UserId>> = HashMap::new();
    for row in rows {
        members
            .entry(row.project_id)
            .or_default()
            .insert(UserId::new(row.user_id));
    }
    Ok(members)
}

fn assemble(
    row: ProjectRow,
    members: &mut HashMap<i64, BTreeSet<UserId>>,
) -> Result<Project, ProjectRepositoryError> {
    let name = row.project_name().map_err(ProjectRepositoryError::query)?;
    Ok(Project {
        id: ProjectId::new(row.id),
        name,
        owner: UserId::new(row.owner_id),
        members: members.remove(&row.id).unwrap_or_default(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn create(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self.connection().await?;
        let new_row = NewProjectRow {
            name: project.name.as_ref(),
            owner_id: project.owner.get(),
        };
        let row: ProjectRow = conn
            .transaction(|conn| {
                async move {
                    let row: ProjectRow = diesel::insert_into(projects::table)
                        .values(&new_row)
                        .returning(ProjectRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(project_members::table)
                        .values(MemberRow {
                            project_id: row.id,
                            user_id: row.owner_id,
                        })
                        .execute(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let mut members = HashMap::from([(row.id, BTreeSet::from([project.owner]))]);
        assemble(row, &mut members)
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.connection().await?;
        let row: Option<ProjectRow> = projects::table
            .find(id.get())
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut members = load_members(&mut conn, &[row.id])
            .await
            .map_err(map_diesel_error)?;
        assemble(row, &mut members).map(Some)
    }

    async fn list_for_member(&self, user: UserId) -> Result<Vec<Project>, ProjectRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<ProjectRow> = projects::table
            .filter(
                projects::id.eq_any(
                    project_members::table
                        .filter(project_members::user_id.eq(user.get()))
                        .select(project_members::project_id),
                ),
            )
            .order_by(projects::id)
            .select(ProjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut members = load_members(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| assemble(row, &mut members))
            .collect()
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, ProjectRepositoryError> {
        let mut conn = self.connection().await?;
        let raw = id.get();
        conn.transaction(|conn| {
            async move {
                let project_todos = || {
                    todos::table
                        .filter(todos::project_id.eq(raw))
                        .select(todos::id)
                };
                diesel::delete(comments::table.filter(comments::todo_id.eq_any(project_todos())))
                    .execute(conn)
                    .await?;
                diesel::delete(todo_tags::table.filter(todo_tags::todo_id.eq_any(project_todos())))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    todo_assignees::table.filter(todo_assignees::todo_id.eq_any(project_todos())),
                )
                .execute(conn)
                .await?;
                diesel::delete(todos::table.filter(todos::project_id.eq(raw)))
                    .execute(conn)
                    .await?;
                diesel::delete(tags::table.filter(tags::project_id.eq(raw)))
                    .execute(conn)
                    .await?;
                diesel::delete(project_members::table.filter(project_members::project_id.eq(raw)))
                    .execute(conn)
                    .await?;
                let removed = diesel::delete(projects::table.find(raw))
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(removed > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn add_members(
        &self,
        id: ProjectId,
        new_members: &[UserId],
    ) -> Result<(), ProjectRepositoryError> {
        let raw = id.get();
        let candidates: BTreeSet<i64> = new_members.iter().map(|user| user.get()).collect();
        let rows: Vec<MemberRow> = candidates
            .iter()
            .map(|user_id| MemberRow {
                project_id: raw,
                user_id: *user_id,
            })
            .collect();
        let mut conn = self.connection().await?;
        let outcome: Result<(), TxError<ProjectRepositoryError>> = conn
            .transaction(|conn| {
                async move {
                    let exists: bool =
                        diesel::select(diesel::dsl::exists(projects::table.find(raw)))
                            .get_result(conn)
                            .await?;
                    if !exists {
                        return Err(TxError::Abort(missing(raw)));
                    }
                    let known: Vec<i64> = users::table
                        .filter(users::id.eq_any(&candidates))
                        .select(users::id)
                        .load(conn)
                        .await?;
                    if let Some(unknown) = candidates.iter().find(|user| !known.contains(user)) {
                        return Err(TxError::Abort(ProjectRepositoryError::query(format!(
                            "user {unknown} does not exist"
                        ))));
                    }
                    diesel::insert_into(project_members::table)
                        .values(&rows)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await;
        outcome.map_err(|err| err.resolve(map_diesel_error))
    }

    async fn remove_member(
        &self,
        id: ProjectId,
        user: UserId,
    ) -> Result<(), ProjectRepositoryError> {
        let (raw, user_raw) = (id.get(), user.get());
        let mut conn = self.connection().await?;
        let outcome: Result<(), TxError<ProjectRepositoryError>> = conn
            .transaction(|conn| {
                async move {
                    let exists: bool =
                        diesel::select(diesel::dsl::exists(projects::table.find(raw)))
                            .get_result(conn)
                            .await?;
                    if !exists {
                        return Err(TxError::Abort(missing(raw)));
                    }
                    diesel::delete(
                        project_members::table
                            .filter(project_members::project_id.eq(raw))
                            .filter(project_members::user_id.eq(user_raw)),
                    )
                    .execute(conn)
                    .await?;
                    // A non-member cannot stay assigned to the project's todos.
                    diesel::delete(
                        todo_assignees::table
                            .filter(todo_assignees::user_id.eq(user_raw))
                            .filter(
                                todo_assignees::todo_id.eq_any(
                                    todos::table
                                        .filter(todos::project_id.eq(raw))
                                        .select(todos::id),
                                ),
                            ),
                    )
                    .execute(conn)
                    .await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await;
        outcome.map_err(|err| err.resolve(map_diesel_error))
    }
}
