//! Tests for the project endpoints.

use super::*;
use crate::inbound::http::test_utils::{MockPorts, init_api, json_body, signed_in};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::json;
use std::collections::BTreeSet;

fn project(id: i64, owner: i64) -> Project {
    let at = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).single().expect("timestamp");
    Project {
        id: ProjectId::new(id),
        name: ProjectName::new("Launch").expect("name"),
        owner: UserId::new(owner),
        members: BTreeSet::from([UserId::new(owner)]),
        created_at: at,
        updated_at: at,
    }
}

fn user(id: i64, username: &str) -> User {
    User {
        id: UserId::new(id),
        username: username.to_owned(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
    }
}

#[actix_web::test]
async fn create_returns_the_summary() {
    let mut ports = MockPorts::default();
    ports
        .projects
        .expect_create()
        .withf(|actor, name| *actor == UserId::new(1) && name.as_ref() == "Launch")
        .times(1)
        .returning(|_, _| Ok(project(7, 1)));
    let app = init_api(ports.into_state()).await;
    let cookie = signed_in(&app, 1).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/projects")
            .cookie(cookie)
            .set_json(json!({"name": "  Launch "}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        json_body(res).await,
        json!({"id": 7, "name": "Launch", "owner": 1})
    );
}

#[rstest]
#[case(json!({}), "missing_field")]
#[case(json!({"name": "   "}), "blank")]
#[case(json!({"name": "x".repeat(51)}), "too_long")]
#[actix_web::test]
async fn create_validates_the_name(#[case] body: serde_json::Value, #[case] code: &str) {
    let app = init_api(MockPorts::default().into_state()).await;
    let cookie = signed_in(&app, 1).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/projects")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["details"]["field"], "name");
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn anonymous_callers_are_rejected() {
    let app = init_api(MockPorts::default().into_state()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/projects")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn detail_passes_the_assignee_filter() {
    let mut ports = MockPorts::default();
    ports
        .projects
        .expect_detail()
        .with(eq(ProjectDetailRequest {
            actor: UserId::new(1),
            project: ProjectId::new(7),
            assignees: vec![UserId::new(2), UserId::new(3)],
        }))
        .times(1)
        .returning(|_| {
            Ok(ProjectDetail {
                project: project(7, 1),
                members: vec![user(1, "ada")],
                todos: Vec::new(),
                tags: Vec::new(),
            })
        });
    let app = init_api(ports.into_state()).await;
    let cookie = signed_in(&app, 1).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/projects/7?assignees=2,3")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["members"][0]["username"], "ada");
    assert_eq!(body["todos"], json!([]));
}

#[actix_web::test]
async fn detail_rejects_a_non_integer_assignee() {
    let app = init_api(MockPorts::default().into_state()).await;
    let cookie = signed_in(&app, 1).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/projects/7?assignees=2,bob")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["details"]["value"], "bob");
}

#[rstest]
#[case(Ok(()), StatusCode::NO_CONTENT)]
#[case(Err(Error::forbidden("only the owner may delete the project")), StatusCode::FORBIDDEN)]
#[case(Err(Error::not_found("project not found")), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn delete_maps_the_outcome(#[case] outcome: Result<(), Error>, #[case] status: StatusCode) {
    let mut ports = MockPorts::default();
    ports
        .projects
        .expect_delete()
        .with(eq(UserId::new(2)), eq(ProjectId::new(7)))
        .times(1)
        .return_once(move |_, _| outcome);
    let app = init_api(ports.into_state()).await;
    let cookie = signed_in(&app, 2).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/projects/7")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), status);
}

#[actix_web::test]
async fn invite_returns_the_added_members() {
    let mut ports = MockPorts::default();
    ports
        .projects
        .expect_invite_members()
        .with(eq(InviteMembersRequest {
            actor: UserId::new(1),
            project: ProjectId::new(7),
            users: vec![UserId::new(2)],
        }))
        .times(1)
        .returning(|_| Ok(vec![user(2, "bob")]));
    let app = init_api(ports.into_state()).await;
    let cookie = signed_in(&app, 1).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/projects/7/invite_member")
            .cookie(cookie)
            .set_json(json!({"users": [2]}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await[0]["username"], "bob");
}

#[actix_web::test]
async fn invite_rejects_non_integer_ids() {
    let app = init_api(MockPorts::default().into_state()).await;
    let cookie = signed_in(&app, 1).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/projects/7/invite_member")
            .cookie(cookie)
            .set_json(json!({"users": ["bob"]}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["details"]["code"], "invalid_body");
}

#[actix_web::test]
async fn remove_member_forwards_the_username() {
    let mut ports = MockPorts::default();
    ports
        .projects
        .expect_remove_member()
        .with(eq(RemoveMemberRequest {
            actor: UserId::new(1),
            project: ProjectId::new(7),
            username: "bob".to_owned(),
        }))
        .times(1)
        .returning(|_| Ok(user(2, "bob")));
    let app = init_api(ports.into_state()).await;
    let cookie = signed_in(&app, 1).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/projects/7/remove_member")
            .cookie(cookie)
            .set_json(json!({"username": "bob"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["id"], 2);
}
