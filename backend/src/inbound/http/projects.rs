//! Project endpoints.
//!
//! ```text
//! POST /api/v1/projects {"name":"Launch"}
//! GET /api/v1/projects
//! GET /api/v1/projects/7?assignees=2,3
//! DELETE /api/v1/projects/7
//! POST /api/v1/projects/7/invite_member {"users":[2,3]}
//! POST /api/v1/projects/7/remove_member {"username":"bob"}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{InviteMembersRequest, ProjectDetailRequest, RemoveMemberRequest};
use crate::domain::{
    Error, Project, ProjectDetail, ProjectId, ProjectName, Tag, Todo, User, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id_list, project_name_error, required,
};

/// Project as listed: no nested collections.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: ProjectName,
    pub owner: UserId,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            owner: project.owner,
        }
    }
}

/// Project with its members, todos and tags.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectDetailResponse {
    pub id: ProjectId,
    pub name: ProjectName,
    pub owner: UserId,
    pub members: Vec<User>,
    pub todos: Vec<Todo>,
    pub tags: Vec<Tag>,
}

impl From<ProjectDetail> for ProjectDetailResponse {
    fn from(detail: ProjectDetail) -> Self {
        let ProjectDetail {
            project,
            members,
            todos,
            tags,
        } = detail;
        Self {
            id: project.id,
            name: project.name,
            owner: project.owner,
            members,
            todos,
            tags,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
}

/// Query string of the detail endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProjectDetailQuery {
    /// Comma separated user ids; keeps todos assigned to any of them.
    pub assignees: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct InviteMembersBody {
    pub users: Option<Vec<UserId>>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RemoveMemberBody {
    pub username: Option<String>,
}

/// Create a project owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Created project", body = ProjectSummary),
        (status = 400, description = "Invalid name", body = Error),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projects")]
pub async fn create_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateProjectRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let raw = required(payload.into_inner().name, FieldName::new("name"))?;
    let name = ProjectName::new(raw).map_err(|err| project_name_error(&err))?;
    let project = state.projects.create(actor, name).await?;
    Ok(HttpResponse::Created().json(ProjectSummary::from(project)))
}

/// Projects the caller is a member of.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    responses(
        (status = 200, description = "Projects", body = [ProjectSummary]),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["projects"],
    operation_id = "listProjects"
)]
#[get("/projects")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ProjectSummary>>> {
    let actor = session.require_user_id()?;
    let projects = state.projects.list(actor).await?;
    Ok(web::Json(
        projects.into_iter().map(ProjectSummary::from).collect(),
    ))
}

/// One project with its members, todos and tags.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(("id" = i64, Path, description = "Project id"), ProjectDetailQuery),
    responses(
        (status = 200, description = "Project detail", body = ProjectDetailResponse),
        (status = 400, description = "Malformed assignee filter", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not a member or no such project", body = Error)
    ),
    tags = ["projects"],
    operation_id = "getProject"
)]
#[get("/projects/{id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectId>,
    query: web::Query<ProjectDetailQuery>,
) -> ApiResult<web::Json<ProjectDetailResponse>> {
    let actor = session.require_user_id()?;
    let assignees = match query.assignees.as_deref() {
        Some(raw) => parse_id_list(raw, FieldName::new("assignees"))?,
        None => Vec::new(),
    };
    let detail = state
        .projects
        .detail(ProjectDetailRequest {
            actor,
            project: path.into_inner(),
            assignees,
        })
        .await?;
    Ok(web::Json(detail.into()))
}

/// Delete a project with everything it owns. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Caller is not the owner", body = Error),
        (status = 404, description = "Not a member or no such project", body = Error)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/projects/{id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectId>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state.projects.delete(actor, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add users to the project's members.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/invite_member",
    params(("id" = i64, Path, description = "Project id")),
    request_body = InviteMembersBody,
    responses(
        (status = 200, description = "Added members", body = [User]),
        (status = 400, description = "Unknown user", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not a member or no such project", body = Error)
    ),
    tags = ["projects"],
    operation_id = "inviteMembers"
)]
#[post("/projects/{id}/invite_member")]
pub async fn invite_member(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectId>,
    payload: web::Json<InviteMembersBody>,
) -> ApiResult<web::Json<Vec<User>>> {
    let actor = session.require_user_id()?;
    let users = required(payload.into_inner().users, FieldName::new("users"))?;
    let added = state
        .projects
        .invite_members(InviteMembersRequest {
            actor,
            project: path.into_inner(),
            users,
        })
        .await?;
    Ok(web::Json(added))
}

/// Remove a member by username and unassign them from the project's todos.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/remove_member",
    params(("id" = i64, Path, description = "Project id")),
    request_body = RemoveMemberBody,
    responses(
        (status = 200, description = "Removed member", body = User),
        (status = 400, description = "Unknown user, owner or non-member", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not a member or no such project", body = Error)
    ),
    tags = ["projects"],
    operation_id = "removeMember"
)]
#[post("/projects/{id}/remove_member")]
pub async fn remove_member(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectId>,
    payload: web::Json<RemoveMemberBody>,
) -> ApiResult<web::Json<User>> {
    let actor = session.require_user_id()?;
    let username = required(payload.into_inner().username, FieldName::new("username"))?;
    let removed = state
        .projects
        .remove_member(RemoveMemberRequest {
            actor,
            project: path.into_inner(),
            username,
        })
        .await?;
    Ok(web::Json(removed))
}

#[cfg(test)]
mod tests;
