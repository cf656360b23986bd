//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::ports::{
    MockCommentOperations, MockLoginService, MockProjectOperations, MockTagOperations,
    MockTodoOperations, MockUserDirectory,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{json_config, query_config};

/// Session middleware with a fresh key and the `Secure` flag off for plain
/// HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Mocked driving ports; set expectations before calling [`Self::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub projects: MockProjectOperations,
    pub tags: MockTagOperations,
    pub todos: MockTodoOperations,
    pub comments: MockCommentOperations,
    pub login: MockLoginService,
    pub users: MockUserDirectory,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            projects: Arc::new(self.projects),
            tags: Arc::new(self.tags),
            todos: Arc::new(self.todos),
            comments: Arc::new(self.comments),
            login: Arc::new(self.login),
            users: Arc::new(self.users),
        })
    }
}

async fn sign_in(path: web::Path<i64>, session: SessionContext) -> Result<HttpResponse, Error> {
    session.persist_user(UserId::new(path.into_inner()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Every API route over `state`, plus `POST /test/sign-in/{id}`.
pub async fn init_api(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .app_data(json_config())
            .app_data(query_config())
            .wrap(test_session_middleware())
            .route("/test/sign-in/{id}", web::post().to(sign_in))
            .service(web::scope("/api/v1").configure(super::api_routes)),
    )
    .await
}

/// Session cookie for `user`.
pub async fn signed_in<S>(app: &S, user: i64) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/sign-in/{user}"))
            .to_request(),
    )
    .await;
    session_cookie(&res)
}

/// Decode a JSON response body.
pub async fn json_body(res: ServiceResponse<BoxBody>) -> serde_json::Value {
    let bytes = test::read_body(res).await;
    serde_json::from_slice(&bytes).expect("JSON body")
}
