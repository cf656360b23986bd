//! Bulk reorder endpoint.
//!
//! `POST /api/v1/sort-todos {"order":[3,1,2]}` renumbers the listed todos to
//! `0..N-1` in one transaction. Success and failure both carry an empty body;
//! malformed input and unknown ids collapse into a bare `400`.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TodoId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Desired order; a missing `order` key means an empty sequence.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SortPayload {
    #[serde(default)]
    #[schema(value_type = Vec<i64>)]
    pub order: Vec<TodoId>,
}

fn parse_payload(body: &[u8]) -> Option<SortPayload> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Some(SortPayload::default());
    }
    serde_json::from_slice(body)
        .inspect_err(|err| debug!(error = %err, "malformed reorder payload"))
        .ok()
}

fn collapses_to_bad_request(error: &Error) -> bool {
    matches!(
        error.code(),
        ErrorCode::InvalidRequest | ErrorCode::NotFound
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/sort-todos",
    request_body = SortPayload,
    responses(
        (status = 200, description = "Reordered"),
        (status = 400, description = "Malformed order or unknown todo"),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["todos"],
    operation_id = "sortTodos"
)]
#[post("/sort-todos")]
pub async fn sort_todos(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let Some(payload) = parse_payload(&body) else {
        return Ok(HttpResponse::BadRequest().finish());
    };
    match state.todos.reorder(actor, payload.order).await {
        Ok(()) => Ok(HttpResponse::Ok().finish()),
        Err(err) if collapses_to_bad_request(&err) => {
            debug!(error = %err.message(), "reorder rejected");
            Ok(HttpResponse::BadRequest().finish())
        }
        Err(err) => Err(err),
    }
}
