//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every `/api/v1` endpoint, the health probes and the
//! domain schemas they exchange. The session cookie is registered as the
//! security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi_dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Comment, Error, ErrorCode, Priority, Tag, Todo, User};
use crate::inbound::http::comments::CreateCommentBody;
use crate::inbound::http::projects::{
    CreateProjectRequest, InviteMembersBody, ProjectDetailResponse, ProjectSummary,
    RemoveMemberBody,
};
use crate::inbound::http::sort::SortPayload;
use crate::inbound::http::tags::TagPayload;
use crate::inbound::http::todos::TodoPayload;
use crate::inbound::http::users::{Detail, LoginRequest, RegisterRequest, SessionStatus};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Taskboard API",
        description = "Projects, tags, ordered todos and comments scoped by project membership."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::session_status,
        crate::inbound::http::users::whoami,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::projects::invite_member,
        crate::inbound::http::projects::remove_member,
        crate::inbound::http::tags::create_tag,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::get_tag,
        crate::inbound::http::tags::replace_tag,
        crate::inbound::http::tags::update_tag,
        crate::inbound::http::tags::delete_tag,
        crate::inbound::http::todos::create_todo,
        crate::inbound::http::todos::list_todos,
        crate::inbound::http::todos::get_todo,
        crate::inbound::http::todos::replace_todo,
        crate::inbound::http::todos::update_todo,
        crate::inbound::http::todos::delete_todo,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::get_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::sort::sort_todos,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Tag,
        Todo,
        Comment,
        Priority,
        Error,
        ErrorCode,
        LoginRequest,
        RegisterRequest,
        Detail,
        SessionStatus,
        ProjectSummary,
        ProjectDetailResponse,
        CreateProjectRequest,
        InviteMembersBody,
        RemoveMemberBody,
        TagPayload,
        TodoPayload,
        CreateCommentBody,
        SortPayload,
    )),
    tags(
        (name = "users", description = "Registration, login and the current session"),
        (name = "projects", description = "Projects and their members"),
        (name = "tags", description = "Project-scoped tags"),
        (name = "todos", description = "Todos and their manual order"),
        (name = "comments", description = "Comments on todos"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
