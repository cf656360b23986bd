//! Todo endpoints.
//!
//! ```text
//! POST /api/v1/todos {"title":"Ship","project":7,"priority":"high","tags":[3],"assignees":[2]}
//! PATCH /api/v1/todos/11 {"assignees":[]}
//! ```
//!
//! Creation defaults an absent description to `""`, priority to medium and
//! tag and assignee lists to empty. `PUT` needs `title` and `project`.

use std::collections::BTreeSet;

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, NewTodo, Priority, ProjectId, TagId, Todo, TodoChanges, TodoId, TodoTitle, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, required, todo_title_error};

const TITLE: FieldName = FieldName::new("title");
const PROJECT: FieldName = FieldName::new("project");

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TodoPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    #[schema(value_type = Option<Vec<i64>>)]
    pub tags: Option<Vec<TagId>>,
    #[schema(value_type = Option<Vec<i64>>)]
    pub assignees: Option<Vec<UserId>>,
    pub project: Option<ProjectId>,
}

fn todo_title(raw: &str) -> Result<TodoTitle, Error> {
    TodoTitle::new(raw).map_err(|err| todo_title_error(&err))
}

fn id_set<T: Ord>(ids: Option<Vec<T>>) -> Option<BTreeSet<T>> {
    ids.map(|ids| ids.into_iter().collect())
}

impl TodoPayload {
    fn into_new_todo(self) -> Result<NewTodo, Error> {
        Ok(NewTodo {
            title: todo_title(&required(self.title, TITLE)?)?,
            description: self.description.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            tags: id_set(self.tags).unwrap_or_default(),
            assignees: id_set(self.assignees).unwrap_or_default(),
            project: required(self.project, PROJECT)?,
        })
    }

    fn into_changes(self, partial: bool) -> Result<TodoChanges, Error> {
        let title = if partial {
            self.title.as_deref().map(todo_title).transpose()?
        } else {
            Some(todo_title(&required(self.title, TITLE)?)?)
        };
        let project = if partial {
            self.project
        } else {
            Some(required(self.project, PROJECT)?)
        };
        Ok(TodoChanges {
            title,
            description: self.description,
            priority: self.priority,
            tags: id_set(self.tags),
            assignees: id_set(self.assignees),
            project,
        })
    }
}

/// Create a todo at the end of its project's order.
#[utoipa::path(
    post,
    path = "/api/v1/todos",
    request_body = TodoPayload,
    responses(
        (status = 201, description = "Created todo", body = Todo),
        (status = 400, description = "Invalid todo, foreign tag or non-member assignee", body = Error),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["todos"],
    operation_id = "createTodo"
)]
#[post("/todos")]
pub async fn create_todo(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TodoPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let todo = payload.into_inner().into_new_todo()?;
    let created = state.todos.create(actor, todo).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Todos of every project the caller belongs to, in manual order.
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    responses(
        (status = 200, description = "Todos", body = [Todo]),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["todos"],
    operation_id = "listTodos"
)]
#[get("/todos")]
pub async fn list_todos(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Todo>>> {
    let actor = session.require_user_id()?;
    Ok(web::Json(state.todos.list(actor).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo", body = Todo),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error)
    ),
    tags = ["todos"],
    operation_id = "getTodo"
)]
#[get("/todos/{id}")]
pub async fn get_todo(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TodoId>,
) -> ApiResult<web::Json<Todo>> {
    let actor = session.require_user_id()?;
    Ok(web::Json(state.todos.get(actor, path.into_inner()).await?))
}

async fn update(
    state: &HttpState,
    session: &SessionContext,
    id: TodoId,
    payload: TodoPayload,
    partial: bool,
) -> ApiResult<web::Json<Todo>> {
    let actor = session.require_user_id()?;
    let changes = payload.into_changes(partial)?;
    Ok(web::Json(state.todos.update(actor, id, changes).await?))
}

/// Replace a todo's fields. Omitted optional fields keep their values.
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    params(("id" = i64, Path, description = "Todo id")),
    request_body = TodoPayload,
    responses(
        (status = 200, description = "Updated todo", body = Todo),
        (status = 400, description = "Invalid todo or project change", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error)
    ),
    tags = ["todos"],
    operation_id = "replaceTodo"
)]
#[put("/todos/{id}")]
pub async fn replace_todo(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TodoId>,
    payload: web::Json<TodoPayload>,
) -> ApiResult<web::Json<Todo>> {
    update(&state, &session, path.into_inner(), payload.into_inner(), false).await
}

/// Change the supplied fields of a todo.
#[utoipa::path(
    patch,
    path = "/api/v1/todos/{id}",
    params(("id" = i64, Path, description = "Todo id")),
    request_body = TodoPayload,
    responses(
        (status = 200, description = "Updated todo", body = Todo),
        (status = 400, description = "Invalid todo or project change", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error)
    ),
    tags = ["todos"],
    operation_id = "updateTodo"
)]
#[patch("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TodoId>,
    payload: web::Json<TodoPayload>,
) -> ApiResult<web::Json<Todo>> {
    update(&state, &session, path.into_inner(), payload.into_inner(), true).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Deleted with its comments"),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error)
    ),
    tags = ["todos"],
    operation_id = "deleteTodo"
)]
#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TodoId>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state.todos.delete(actor, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
