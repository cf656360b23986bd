//! PostgreSQL-backed [`TodoRepository`].
//!
//! Tags and assignees live in join tables and are rewritten wholesale when
//! an update supplies them. Appending a todo and reordering the collection
//! both run in a single transaction.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use super::error_mapping::{
    StorageFault, TxError, classify, map_pool_error, position_from_db, position_to_db,
};
use super::models::{NewTodoRow, TodoAssigneeRow, TodoRow, TodoTagRow, TodoUpdate};
use super::pool::DbPool;
use super::schema::{comments, project_members, todo_assignees, todo_tags, todos};
use crate::domain::ordering::{ReorderPlan, next_order};
use crate::domain::ports::{TodoRepository, TodoRepositoryError};
use crate::domain::{
    NewTodo, Priority, ProjectId, TagId, Todo, TodoChanges, TodoId, TodoTitle, UserId,
};

/// Diesel implementation of the [`TodoRepository`] port.
#[derive(Clone)]
pub struct DieselTodoRepository {
    pool: DbPool,
}

impl DieselTodoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, AsyncPgConnection>, TodoRepositoryError> {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TodoRepositoryError::connection))
    }
}

fn map_diesel_error(error: diesel::result::Error) -> TodoRepositoryError {
    match classify(error) {
        StorageFault::Connection(message) => TodoRepositoryError::connection(message),
        StorageFault::Query(message) => TodoRepositoryError::query(message),
        StorageFault::UniqueViolation { .. } => TodoRepositoryError::query("unique violation"),
        StorageFault::ForeignKeyViolation { .. } => {
            TodoRepositoryError::query("referenced row does not exist")
        }
    }
}

/// Tag and assignee sets for a batch of todos.
#[derive(Default)]
struct Relations {
    tags: HashMap<i64, BTreeSet<TagId>>,
    assignees: HashMap<i64, BTreeSet<UserId>>,
}

async fn load_relations(conn: &mut AsyncPgConnection, todo_ids: &[i64]) -> QueryResult<Relations> {
    let mut relations = Relations::default();
    if todo_ids.is_empty() {
        return Ok(relations);
    }
    let tag_rows: Vec<TodoTagRow> = todo_tags::table
        .filter(todo_tags::todo_id.eq_any(todo_ids))
        .select(TodoTagRow::as_select())
        .load(conn)
        .await?;
    for row in tag_rows {
        relations
            .tags
            .entry(row.todo_id)
            .or_default()
            .insert(TagId::new(row.tag_id));
    }
    let assignee_rows: Vec<TodoAssigneeRow> = todo_assignees::table
        .filter(todo_assignees::todo_id.eq_any(todo_ids))
        .select(TodoAssigneeRow::as_select())
        .load(conn)
        .await?;
    for row in assignee_rows {
        relations
            .assignees
            .entry(row.todo_id)
            .or_default()
            .insert(UserId::new(row.user_id));
    }
    Ok(relations)
}

fn assemble(row: TodoRow, relations: &mut Relations) -> Result<Todo, TodoRepositoryError> {
    let title = TodoTitle::new(&row.title)
        .map_err(|err| TodoRepositoryError::query(format!("invalid todo title in database: {err}")))?;
    let priority = Priority::from_code(&row.priority).ok_or_else(|| {
        TodoRepositoryError::query(format!("invalid priority {:?} in database", row.priority))
    })?;
    let order = position_from_db(row.position).map_err(TodoRepositoryError::query)?;
    Ok(Todo {
        id: TodoId::new(row.id),
        title,
        description: row.description,
        priority,
        tags: relations.tags.remove(&row.id).unwrap_or_default(),
        assignees: relations.assignees.remove(&row.id).unwrap_or_default(),
        project: ProjectId::new(row.project_id),
        order,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Load relations for `rows` and convert them, keeping the row order.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<TodoRow>,
) -> Result<Vec<Todo>, TodoRepositoryError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut relations = load_relations(conn, &ids)
        .await
        .map_err(map_diesel_error)?;
    rows.into_iter()
        .map(|row| assemble(row, &mut relations))
        .collect()
}

async fn replace_tags(
    conn: &mut AsyncPgConnection,
    todo_id: i64,
    tags: &BTreeSet<TagId>,
) -> QueryResult<()> {
    diesel::delete(todo_tags::table.filter(todo_tags::todo_id.eq(todo_id)))
        .execute(conn)
        .await?;
    let rows: Vec<TodoTagRow> = tags
        .iter()
        .map(|tag| TodoTagRow {
            todo_id,
            tag_id: tag.get(),
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(todo_tags::table)
            .values(&rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Rewrite the assignee set of `todo_id`.
///
/// The assignees' membership rows are read `FOR SHARE`, so a concurrent
/// member removal either commits first and fails this write, or waits and
/// then unassigns the member itself.
async fn replace_assignees(
    conn: &mut AsyncPgConnection,
    project_id: i64,
    todo_id: i64,
    assignees: &BTreeSet<UserId>,
) -> Result<(), TxError<TodoRepositoryError>> {
    if !assignees.is_empty() {
        let wanted: Vec<i64> = assignees.iter().map(|user| user.get()).collect();
        let members: Vec<i64> = project_members::table
            .filter(project_members::project_id.eq(project_id))
            .filter(project_members::user_id.eq_any(&wanted))
            .select(project_members::user_id)
            .for_share()
            .load(conn)
            .await?;
        if let Some(user) = assignees.iter().find(|user| !members.contains(&user.get())) {
            return Err(TxError::Abort(TodoRepositoryError::non_member_assignee(*user)));
        }
    }
    diesel::delete(todo_assignees::table.filter(todo_assignees::todo_id.eq(todo_id)))
        .execute(conn)
        .await?;
    let rows: Vec<TodoAssigneeRow> = assignees
        .iter()
        .map(|user| TodoAssigneeRow {
            todo_id,
            user_id: user.get(),
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(todo_assignees::table)
            .values(&rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn create(&self, todo: &NewTodo) -> Result<Todo, TodoRepositoryError> {
        let project_id = todo.project.get();
        let mut conn = self.connection().await?;
        let outcome: Result<TodoRow, TxError<TodoRepositoryError>> = conn
            .transaction(|conn| {
                async move {
                    let current_max: Option<i32> = todos::table
                        .filter(todos::project_id.eq(project_id))
                        .select(diesel::dsl::max(todos::position))
                        .first(conn)
                        .await?;
                    let current_max = current_max
                        .map(position_from_db)
                        .transpose()
                        .map_err(|err| TxError::Abort(TodoRepositoryError::query(err)))?;
                    let position = position_to_db(next_order(current_max))
                        .map_err(|err| TxError::Abort(TodoRepositoryError::query(err)))?;
                    let row: TodoRow = diesel::insert_into(todos::table)
                        .values(NewTodoRow {
                            title: todo.title.as_ref(),
                            description: &todo.description,
                            priority: todo.priority.code(),
                            project_id,
                            position,
                        })
                        .returning(TodoRow::as_returning())
                        .get_result(conn)
                        .await?;
                    replace_tags(conn, row.id, &todo.tags).await?;
                    replace_assignees(conn, project_id, row.id, &todo.assignees).await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await;
        let row = outcome.map_err(|err| err.resolve(map_diesel_error))?;
        let mut relations = Relations::default();
        relations.tags.insert(row.id, todo.tags.clone());
        relations.assignees.insert(row.id, todo.assignees.clone());
        assemble(row, &mut relations)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoRepositoryError> {
        let mut conn = self.connection().await?;
        let row: Option<TodoRow> = todos::table
            .find(id.get())
            .select(TodoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(hydrate(&mut conn, vec![row]).await?.pop())
    }

    async fn list_for_member(&self, user: UserId) -> Result<Vec<Todo>, TodoRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<TodoRow> = todos::table
            .filter(
                todos::project_id.eq_any(
                    project_members::table
                        .filter(project_members::user_id.eq(user.get()))
                        .select(project_members::project_id),
                ),
            )
            .order_by((todos::position, todos::id))
            .select(TodoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn list_by_project(
        &self,
        project: ProjectId,
        assignees: &[UserId],
    ) -> Result<Vec<Todo>, TodoRepositoryError> {
        let mut conn = self.connection().await?;
        let in_project = todos::table
            .filter(todos::project_id.eq(project.get()))
            .select(TodoRow::as_select())
            .into_boxed::<diesel::pg::Pg>();
        let query = if assignees.is_empty() {
            in_project.order_by((todos::position, todos::id))
        } else {
            let users: Vec<i64> = assignees.iter().map(|user| user.get()).collect();
            in_project
                .filter(
                    todos::id.eq_any(
                        todo_assignees::table
                            .filter(todo_assignees::user_id.eq_any(users))
                            .select(todo_assignees::todo_id),
                    ),
                )
                .order_by(todos::id)
        };
        let rows: Vec<TodoRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn update(
        &self,
        id: TodoId,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, TodoRepositoryError> {
        let raw = id.get();
        let mut conn = self.connection().await?;
        let outcome: Result<Option<TodoRow>, TxError<TodoRepositoryError>> = conn
            .transaction(|conn| {
                async move {
                    let changeset = TodoUpdate {
                        title: changes.title.as_ref().map(AsRef::as_ref),
                        description: changes.description.as_deref(),
                        priority: changes.priority.map(Priority::code),
                    };
                    let updated: Option<TodoRow> = diesel::update(todos::table.find(raw))
                        .set((changeset, todos::updated_at.eq(now)))
                        .returning(TodoRow::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?;
                    let Some(updated) = updated else {
                        return Ok(None);
                    };
                    if let Some(tags) = &changes.tags {
                        replace_tags(conn, raw, tags).await?;
                    }
                    if let Some(assignees) = &changes.assignees {
                        replace_assignees(conn, updated.project_id, raw, assignees).await?;
                    }
                    Ok(Some(updated))
                }
                .scope_boxed()
            })
            .await;
        let Some(row) = outcome.map_err(|err| err.resolve(map_diesel_error))? else {
            return Ok(None);
        };
        Ok(hydrate(&mut conn, vec![row]).await?.pop())
    }

    async fn delete(&self, id: TodoId) -> Result<bool, TodoRepositoryError> {
        let raw = id.get();
        let mut conn = self.connection().await?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(comments::table.filter(comments::todo_id.eq(raw)))
                    .execute(conn)
                    .await?;
                let removed = diesel::delete(todos::table.find(raw)).execute(conn).await?;
                Ok::<_, diesel::result::Error>(removed > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn reorder(&self, plan: &ReorderPlan) -> Result<(), TodoRepositoryError> {
        if plan.is_empty() {
            return Ok(());
        }
        let assignments = plan
            .assignments()
            .map(|(id, position)| position_to_db(position).map(|position| (id, position)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(TodoRepositoryError::query)?;
        let raw: Vec<i64> = plan.ids().iter().map(|id| id.get()).collect();
        let mut conn = self.connection().await?;
        let outcome: Result<(), TxError<TodoRepositoryError>> = conn
            .transaction(|conn| {
                async move {
                    let existing: Vec<i64> = todos::table
                        .filter(todos::id.eq_any(&raw))
                        .select(todos::id)
                        .for_update()
                        .load(conn)
                        .await?;
                    if let Some(missing) = plan.ids().iter().find(|id| !existing.contains(&id.get()))
                    {
                        return Err(TxError::Abort(TodoRepositoryError::unknown_todo(*missing)));
                    }
                    for (id, position) in assignments {
                        diesel::update(todos::table.find(id.get()))
                            .set(todos::position.eq(position))
                            .execute(conn)
                            .await?;
                    }
                    Ok(())
                }
                .scope_boxed()
            })
            .await;
        outcome.map_err(|err| err.resolve(map_diesel_error))
    }
}
