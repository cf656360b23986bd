//! Registration, login and session endpoints.
//!
//! ```text
//! POST /api/v1/register {"username":"ada","password1":"pw","password2":"pw"}
//! POST /api/v1/login {"username":"ada","password":"pw"}
//! POST /api/v1/logout
//! GET /api/v1/session
//! GET /api/v1/whoami
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::UserDirectoryError;
use crate::domain::{
    Error, LoginCredentials, LoginValidationError, Registration, RegistrationError,
    RegistrationInput, User, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error};

/// Body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Body for `POST /api/v1/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "last_name")]
    pub last_name: String,
    pub password1: String,
    pub password2: String,
}

impl RegisterRequest {
    fn input(&self) -> RegistrationInput<'_> {
        RegistrationInput {
            username: &self.username,
            email: &self.email,
            first_name: &self.first_name,
            last_name: &self.last_name,
            password1: &self.password1,
            password2: &self.password2,
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Detail {
    pub detail: String,
}

/// Body of `GET /api/v1/session`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub is_authenticated: bool,
}

fn login_validation_error(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => FieldName::new("username"),
        LoginValidationError::EmptyPassword => FieldName::new("password"),
    };
    field_error(field, "blank", err.to_string())
}

fn registration_error(err: &RegistrationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": err.code(),
    }))
}

fn directory_error(err: UserDirectoryError) -> Error {
    match err {
        UserDirectoryError::Connection { message } => Error::service_unavailable(message),
        other => Error::internal(other.to_string()),
    }
}

async fn load_user(state: &HttpState, id: UserId) -> ApiResult<Option<User>> {
    state.users.find_by_id(id).await.map_err(directory_error)
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered user", body = User),
        (status = 400, description = "Invalid registration", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<User>> {
    let registration =
        Registration::try_new(payload.input()).map_err(|err| registration_error(&err))?;
    let user = state.login.register(&registration).await?;
    info!(user_id = %user.id, "registered user");
    Ok(web::Json(user))
}

/// Authenticate and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in user", body = User,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid credentials", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let credentials =
        LoginCredentials::try_from(&*payload).map_err(|err| login_validation_error(&err))?;
    let user_id = state.login.authenticate(&credentials).await?;
    let user = load_user(&state, user_id)
        .await?
        .ok_or_else(|| Error::internal(format!("authenticated user {user_id} has no record")))?;
    session.persist_user(user_id)?;
    Ok(web::Json(user))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Logged out", body = Detail),
        (status = 400, description = "No session", body = Error)
    ),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<web::Json<Detail>> {
    if session.user_id().is_none() {
        return Err(Error::invalid_request("You're not logged in."));
    }
    session.end();
    Ok(web::Json(Detail {
        detail: "Successfully logged out.".to_owned(),
    }))
}

/// Report whether the caller holds a session.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Authenticated", body = SessionStatus),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["users"],
    operation_id = "sessionStatus"
)]
#[get("/session")]
pub async fn session_status(session: SessionContext) -> ApiResult<web::Json<SessionStatus>> {
    session.require_user_id()?;
    Ok(web::Json(SessionStatus {
        is_authenticated: true,
    }))
}

/// The signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/whoami",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["users"],
    operation_id = "whoami"
)]
#[get("/whoami")]
pub async fn whoami(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let id = session.require_user_id()?;
    match load_user(&state, id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => {
            session.end();
            Err(Error::unauthorized("login required"))
        }
    }
}

#[cfg(test)]
mod tests;
