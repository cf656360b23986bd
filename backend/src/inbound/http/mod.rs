//! HTTP inbound adapter exposing the REST API.
//!
//! Handlers translate requests into calls on the driving ports held in
//! [`state::HttpState`] and map domain errors back through [`error`].

pub mod comments;
pub mod error;
pub mod health;
pub mod projects;
pub mod session;
pub mod session_config;
pub mod sort;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod todos;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every session-aware endpoint. Mount inside the `/api/v1` scope.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::session_status)
        .service(users::whoami)
        .service(projects::create_project)
        .service(projects::list_projects)
        .service(projects::get_project)
        .service(projects::delete_project)
        .service(projects::invite_member)
        .service(projects::remove_member)
        .service(tags::create_tag)
        .service(tags::list_tags)
        .service(tags::get_tag)
        .service(tags::replace_tag)
        .service(tags::update_tag)
        .service(tags::delete_tag)
        .service(todos::create_todo)
        .service(todos::list_todos)
        .service(todos::get_todo)
        .service(todos::replace_todo)
        .service(todos::update_todo)
        .service(todos::delete_todo)
        .service(comments::create_comment)
        .service(comments::list_comments)
        .service(comments::get_comment)
        .service(comments::delete_comment)
        .service(sort::sort_todos);
}
