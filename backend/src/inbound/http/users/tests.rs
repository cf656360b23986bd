//! Tests for the registration, login and session endpoints.

use super::*;
use crate::domain::ports::UserDirectoryError;
use crate::inbound::http::test_utils::{MockPorts, init_api, json_body, session_cookie, signed_in};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::Value;

fn ada() -> User {
    User {
        id: UserId::new(1),
        username: "ada".to_owned(),
        email: "ada@example.com".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
    }
}

fn login_request(username: &str, password: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(LoginRequest {
            username: username.to_owned(),
            password: password.to_owned(),
        })
        .to_request()
}

#[actix_web::test]
async fn login_returns_the_user_and_a_session() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .withf(|creds| creds.username() == "ada" && creds.password() == "pw")
        .times(1)
        .returning(|_| Ok(UserId::new(1)));
    ports
        .users
        .expect_find_by_id()
        .with(eq(UserId::new(1)))
        .returning(|_| Ok(Some(ada())));
    let app = init_api(ports.into_state()).await;

    let res = actix_test::call_service(&app, login_request(" ada ", "pw")).await;

    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res);
    let body = json_body(res).await;
    assert_eq!(body["username"], "ada");
    assert_eq!(body["firstName"], "Ada");

    let status = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/session")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(json_body(status).await["isAuthenticated"], true);
}

#[rstest]
#[case("   ", "pw", "username")]
#[case("ada", "", "password")]
#[actix_web::test]
async fn login_rejects_blank_fields(
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let app = init_api(MockPorts::default().into_state()).await;

    let res = actix_test::call_service(&app, login_request(username, password)).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn wrong_credentials_are_a_bad_request() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .returning(|_| Err(Error::invalid_request("Invalid credentials.")));
    let app = init_api(ports.into_state()).await;

    let res = actix_test::call_service(&app, login_request("ada", "nope")).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.response().cookies().next().is_none());
    assert_eq!(json_body(res).await["message"], "Invalid credentials.");
}

#[actix_web::test]
async fn register_reports_password_mismatch_on_password2() {
    let app = init_api(MockPorts::default().into_state()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(serde_json::json!({
                "username": "ada",
                "password1": "one",
                "password2": "two",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["message"], "The two password fields didn't match.");
    assert_eq!(body["details"]["field"], "password2");
}

#[actix_web::test]
async fn register_accepts_snake_case_names() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_register()
        .withf(|registration| {
            registration.username() == "ada" && registration.user().first_name == "Ada"
        })
        .times(1)
        .returning(|_| Ok(ada()));
    let app = init_api(ports.into_state()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(serde_json::json!({
                "username": "ada",
                "email": "ada@example.com",
                "first_name": "Ada",
                "password1": "pw",
                "password2": "pw",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["id"], 1);
}

#[actix_web::test]
async fn logout_without_a_session_is_rejected() {
    let app = init_api(MockPorts::default().into_state()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["message"], "You're not logged in.");
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let app = init_api(MockPorts::default().into_state()).await;
    let cookie = signed_in(&app, 1).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let removal = session_cookie(&res);
    assert_eq!(removal.value(), "");
    assert_eq!(
        json_body(res).await,
        serde_json::json!({"detail": "Successfully logged out."})
    );
}

#[rstest]
#[case("/api/v1/session")]
#[case("/api/v1/whoami")]
#[actix_web::test]
async fn session_endpoints_require_login(#[case] uri: &str) {
    let app = init_api(MockPorts::default().into_state()).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn whoami_returns_the_current_user() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_find_by_id()
        .with(eq(UserId::new(1)))
        .returning(|_| Ok(Some(ada())));
    let app = init_api(ports.into_state()).await;
    let cookie = signed_in(&app, 1).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/whoami")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = json_body(res).await;
    assert_eq!(body["email"], "ada@example.com");
}

#[actix_web::test]
async fn whoami_reports_an_unreachable_directory() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_find_by_id()
        .returning(|_| Err(UserDirectoryError::connection("refused")));
    let app = init_api(ports.into_state()).await;
    let cookie = signed_in(&app, 1).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/whoami")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}
