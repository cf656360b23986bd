//! Tag endpoints.
//!
//! Tags are visible through the caller's project memberships. `PUT` needs
//! both `name` and `project`; `PATCH` changes whichever is supplied.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, NewTag, ProjectId, Tag, TagChanges, TagId, TagName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, required, tag_name_error};

const NAME: FieldName = FieldName::new("name");
const PROJECT: FieldName = FieldName::new("project");

/// Tag fields accepted by every write endpoint.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TagPayload {
    pub name: Option<String>,
    pub project: Option<ProjectId>,
}

fn tag_name(raw: &str) -> Result<TagName, Error> {
    TagName::new(raw).map_err(|err| tag_name_error(&err))
}

impl TagPayload {
    fn into_new_tag(self) -> Result<NewTag, Error> {
        Ok(NewTag {
            name: tag_name(&required(self.name, NAME)?)?,
            project: required(self.project, PROJECT)?,
        })
    }

    fn into_changes(self, partial: bool) -> Result<TagChanges, Error> {
        if !partial {
            return self.into_new_tag().map(|tag| TagChanges {
                name: Some(tag.name),
                project: Some(tag.project),
            });
        }
        Ok(TagChanges {
            name: self.name.as_deref().map(tag_name).transpose()?,
            project: self.project,
        })
    }
}

/// Create a tag in a project the caller belongs to.
#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = TagPayload,
    responses(
        (status = 201, description = "Created tag", body = Tag),
        (status = 400, description = "Invalid tag or not a member", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 409, description = "Name already used in the project", body = Error)
    ),
    tags = ["tags"],
    operation_id = "createTag"
)]
#[post("/tags")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TagPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let tag = payload.into_inner().into_new_tag()?;
    let created = state.tags.create(actor, tag).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Tags of every project the caller belongs to.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "Tags", body = [Tag]),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Tag>>> {
    let actor = session.require_user_id()?;
    Ok(web::Json(state.tags.list(actor).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = Tag),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error)
    ),
    tags = ["tags"],
    operation_id = "getTag"
)]
#[get("/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TagId>,
) -> ApiResult<web::Json<Tag>> {
    let actor = session.require_user_id()?;
    Ok(web::Json(state.tags.get(actor, path.into_inner()).await?))
}

async fn update(
    state: &HttpState,
    session: &SessionContext,
    id: TagId,
    payload: TagPayload,
    partial: bool,
) -> ApiResult<web::Json<Tag>> {
    let actor = session.require_user_id()?;
    let changes = payload.into_changes(partial)?;
    Ok(web::Json(state.tags.update(actor, id, changes).await?))
}

/// Replace a tag's name and project.
#[utoipa::path(
    put,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = TagPayload,
    responses(
        (status = 200, description = "Updated tag", body = Tag),
        (status = 400, description = "Invalid tag or not a member", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error),
        (status = 409, description = "Name already used in the project", body = Error)
    ),
    tags = ["tags"],
    operation_id = "replaceTag"
)]
#[put("/tags/{id}")]
pub async fn replace_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TagId>,
    payload: web::Json<TagPayload>,
) -> ApiResult<web::Json<Tag>> {
    update(&state, &session, path.into_inner(), payload.into_inner(), false).await
}

/// Change the supplied fields of a tag.
#[utoipa::path(
    patch,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = TagPayload,
    responses(
        (status = 200, description = "Updated tag", body = Tag),
        (status = 400, description = "Invalid tag or not a member", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error),
        (status = 409, description = "Name already used in the project", body = Error)
    ),
    tags = ["tags"],
    operation_id = "updateTag"
)]
#[patch("/tags/{id}")]
pub async fn update_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TagId>,
    payload: web::Json<TagPayload>,
) -> ApiResult<web::Json<Tag>> {
    update(&state, &session, path.into_inner(), payload.into_inner(), true).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Not visible to the caller", body = Error)
    ),
    tags = ["tags"],
    operation_id = "deleteTag"
)]
#[delete("/tags/{id}")]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TagId>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state.tags.delete(actor, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
