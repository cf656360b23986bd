//! Error mapping and lookups shared by the resource services.

use serde_json::json;

use crate::domain::cross_entity::CrossEntityError;
use crate::domain::ports::{
    CommentRepositoryError, ProjectRepository, ProjectRepositoryError, TagRepositoryError,
    TodoRepositoryError, UserDirectoryError,
};
use crate::domain::{Error, Project, ProjectId, UserId};

pub(crate) fn map_project_error(error: ProjectRepositoryError) -> Error {
    match error {
        ProjectRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("project repository unavailable: {message}"))
        }
        ProjectRepositoryError::Query { message } => {
            Error::internal(format!("project repository error: {message}"))
        }
    }
}

pub(crate) fn map_tag_error(error: TagRepositoryError) -> Error {
    match error {
        TagRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("tag repository unavailable: {message}"))
        }
        TagRepositoryError::Query { message } => {
            Error::internal(format!("tag repository error: {message}"))
        }
        TagRepositoryError::Duplicate { name } => Error::conflict("Tag already exists")
            .with_details(json!({"field": "name", "code": "duplicate_tag", "name": name})),
    }
}

pub(crate) fn map_todo_error(error: TodoRepositoryError) -> Error {
    match error {
        TodoRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("todo repository unavailable: {message}"))
        }
        TodoRepositoryError::Query { message } => {
            Error::internal(format!("todo repository error: {message}"))
        }
        TodoRepositoryError::UnknownTodo { .. } => invalid_ordering(),
        TodoRepositoryError::NonMemberAssignee { user } => {
            cross_entity_error(CrossEntityError::NonMemberAssignee { user })
        }
    }
}

pub(crate) fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
        UserDirectoryError::DuplicateUsername { .. } => {
            Error::invalid_request("A user with that username already exists.")
                .with_details(json!({"field": "username", "code": "duplicate_username"}))
        }
        UserDirectoryError::Protected { .. } => {
            Error::conflict("User still owns projects or authored comments")
                .with_details(json!({"code": "protected"}))
        }
    }
}

/// Reorder failures collapse into one outcome without detail.
pub(crate) fn invalid_ordering() -> Error {
    Error::invalid_request("invalid todo order")
}

pub(crate) fn cross_entity_error(error: CrossEntityError) -> Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({"field": error.field(), "code": error.code()}))
}

pub(crate) fn unknown_reference(field: &str, id: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("Invalid pk \"{id}\" - object does not exist."))
        .with_details(json!({"field": field, "code": "does_not_exist"}))
}

/// Load a project named in a payload; a missing one is a validation error.
pub(crate) async fn referenced_project<P>(projects: &P, id: ProjectId) -> Result<Project, Error>
where
    P: ProjectRepository + ?Sized,
{
    projects
        .find_by_id(id)
        .await
        .map_err(map_project_error)?
        .ok_or_else(|| unknown_reference("project", id))
}

/// Load a project through the actor's memberships; anything else is
/// reported as not found.
pub(crate) async fn visible_project<P>(
    projects: &P,
    actor: UserId,
    id: ProjectId,
) -> Result<Project, Error>
where
    P: ProjectRepository + ?Sized,
{
    projects
        .find_by_id(id)
        .await
        .map_err(map_project_error)?
        .filter(|project| project.is_member(actor))
        .ok_or_else(|| Error::not_found(format!("project {id} not found")))
}
