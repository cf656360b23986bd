//! Comment endpoints. The author is always the session user.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CreateCommentRequest;
use crate::domain::{Comment, CommentId, CommentText, Error, TodoId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, comment_text_error, required};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateCommentBody {
    pub todo: Option<TodoId>,
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CommentListQuery {
    /// Only comments on this todo.
    #[param(value_type = Option<i64>)]
    pub todo: Option<TodoId>,
}

/// Comment on a todo in one of the caller's projects.
#[utoipa::path(
    post,
    path = "/api/v1/comments",
    request_body = CreateCommentBody,
    responses(
        (status = 201, description = "Created comment", body = Comment),
        (status = 400, description = "Blank text or todo outside the caller's projects", body = Error),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCommentBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let CreateCommentBody { todo, text } = payload.into_inner();
    let todo = required(todo, FieldName::new("todo"))?;
    let text = CommentText::new(required(text, FieldName::new("text"))?)
        .map_err(|err| comment_text_error(&err))?;
    let created = state
        .comments
        .create(CreateCommentRequest { actor, todo, text })
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Visible comments, optionally narrowed to one todo.
#[utoipa::path(
    get,
    path = "/api/v1/comments",
    params(CommentListQuery),
    responses(
        (status = 200, description = "Comments", body = [Comment]),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CommentListQuery>,
) -> ApiResult<web::Json<Vec<Comment>>> {
    let actor = session.require_user_id()?;
    let comments = state.comments.list(actor, query.into_inner().todo).await?;
    Ok(web::Json(comments))
}

#[utoipa::path(
    get,
    path = "/api/v1/comments/{id}",
    params(("id" = i64, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment", body = Comment),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error)
    ),
    tags = ["comments"],
    operation_id = "getComment"
)]
#[get("/comments/{id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CommentId>,
) -> ApiResult<web::Json<Comment>> {
    let actor = session.require_user_id()?;
    Ok(web::Json(state.comments.get(actor, path.into_inner()).await?))
}

/// Delete one of the caller's own comments.
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    params(("id" = i64, Path, description = "Comment id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Caller is not the author", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CommentId>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state.comments.delete(actor, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::inbound::http::test_utils::{MockPorts, init_api, json_body, signed_in};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::Utc;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::json;

    fn comment(id: i64, author: i64) -> Comment {
        let now = Utc::now();
        Comment {
            id: CommentId::new(id),
            todo: TodoId::new(11),
            author: UserId::new(author),
            text: CommentText::new("Looks good").expect("text"),
            created_at: now,
            updated_at: now,
        }
    }

    #[actix_web::test]
    async fn author_comes_from_the_session() {
        let mut ports = MockPorts::default();
        ports
            .comments
            .expect_create()
            .with(eq(CreateCommentRequest {
                actor: UserId::new(2),
                todo: TodoId::new(11),
                text: CommentText::new("Looks good").expect("text"),
            }))
            .times(1)
            .returning(|_| Ok(comment(5, 2)));
        let app = init_api(ports.into_state()).await;
        let cookie = signed_in(&app, 2).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/comments")
                .cookie(cookie)
                .set_json(json!({"todo": 11, "text": "Looks good", "author": 1}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(json_body(res).await["author"], 2);
    }

    #[rstest]
    #[case(json!({"todo": 11}), "text", "missing_field")]
    #[case(json!({"todo": 11, "text": "  "}), "text", "blank")]
    #[case(json!({"text": "hi"}), "todo", "missing_field")]
    #[actix_web::test]
    async fn create_validates_the_payload(
        #[case] payload: serde_json::Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = init_api(MockPorts::default().into_state()).await;
        let cookie = signed_in(&app, 2).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/comments")
                .cookie(cookie)
                .set_json(payload)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_body(res).await;
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[rstest]
    #[case("/api/v1/comments", None)]
    #[case("/api/v1/comments?todo=11", Some(TodoId::new(11)))]
    #[actix_web::test]
    async fn list_passes_the_todo_filter(#[case] uri: &str, #[case] todo: Option<TodoId>) {
        let mut ports = MockPorts::default();
        ports
            .comments
            .expect_list()
            .with(eq(UserId::new(2)), eq(todo))
            .times(1)
            .returning(|_, _| Ok(vec![comment(5, 2)]));
        let app = init_api(ports.into_state()).await;
        let cookie = signed_in(&app, 2).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await[0]["id"], 5);
    }

    #[actix_web::test]
    async fn malformed_todo_filter_is_a_json_error() {
        let app = init_api(MockPorts::default().into_state()).await;
        let cookie = signed_in(&app, 2).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/comments?todo=abc")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_body(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["code"], "invalid_query");
    }

    #[actix_web::test]
    async fn only_the_author_may_delete() {
        let mut ports = MockPorts::default();
        ports
            .comments
            .expect_delete()
            .with(eq(UserId::new(3)), eq(CommentId::new(5)))
            .returning(|_, _| Err(Error::invalid_request("Only the author can delete a comment.")));
        let app = init_api(ports.into_state()).await;
        let cookie = signed_in(&app, 3).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/comments/5")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
