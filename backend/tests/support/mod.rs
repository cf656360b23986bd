//! Shared harness driving the full `/api/v1` surface through cookie sessions.
//!
//! Integration tests compile as separate crates; each one includes the
//! server's state builders via `#[path]` and hands the resulting state to
//! [`init_app`].

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode};
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};
use taskboard::Trace;
use taskboard::domain::TRACE_ID_HEADER;
use taskboard::inbound::http::api_routes;
use taskboard::inbound::http::session_config::SessionSettings;
use taskboard::inbound::http::state::HttpState;
use taskboard::inbound::http::validation::{json_config, query_config};

/// Plain-HTTP session settings with a throwaway key.
pub fn session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

/// The API as `main` mounts it: trace middleware, JSON config and the
/// production session middleware.
pub async fn init_app(
    state: web::Data<HttpState>,
    session: &SessionSettings,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> + use<> {
    actix_test::init_service(
        App::new()
            .app_data(state)
            .app_data(json_config())
            .app_data(query_config())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session.middleware())
                    .configure(api_routes),
            ),
    )
    .await
}

/// Signed-in test user.
pub struct Caller {
    pub id: i64,
    pub cookie: Cookie<'static>,
}

#[derive(Debug)]
pub struct Captured {
    pub status: StatusCode,
    pub trace_id: Option<String>,
    pub body: Value,
}

/// Send `payload` as JSON to `path` under `/api/v1`, as `caller` when given.
pub async fn request<S>(
    app: &S,
    caller: Option<&Caller>,
    method: Method,
    path: &str,
    payload: Option<Value>,
) -> Captured
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let mut req = actix_test::TestRequest::default()
        .method(method)
        .uri(&format!("/api/v1{path}"));
    if let Some(caller) = caller {
        req = req.cookie(caller.cookie.clone());
    }
    if let Some(payload) = payload {
        req = req.set_json(payload);
    }
    let res = actix_test::call_service(app, req.to_request()).await;
    let status = res.status();
    let trace_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Captured {
        status,
        trace_id,
        body,
    }
}

/// Register `username` with password `pw` and log in.
pub async fn sign_up<S>(app: &S, username: &str) -> Caller
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let registered = request(
        app,
        None,
        Method::POST,
        "/register",
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "firstName": username,
            "password1": "pw",
            "password2": "pw",
        })),
    )
    .await;
    assert_eq!(registered.status, StatusCode::OK, "{:?}", registered.body);

    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": username, "password": "pw"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie");
    Caller {
        id: registered.body["id"].as_i64().expect("user id"),
        cookie,
    }
}

/// Id field of a created entity.
pub fn id_of(captured: &Captured) -> i64 {
    captured.body["id"].as_i64().expect("entity id")
}
