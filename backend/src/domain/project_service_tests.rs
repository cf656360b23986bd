//! Tests for the project service.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    MockProjectRepository, MockTagRepository, MockTodoRepository, MockUserDirectory,
    ProjectRepositoryError,
};

const OWNER: UserId = UserId::new(1);
const MEMBER: UserId = UserId::new(2);
const OUTSIDER: UserId = UserId::new(3);
const PROJECT: ProjectId = ProjectId::new(10);

type Service =
    ProjectService<MockProjectRepository, MockTodoRepository, MockTagRepository, MockUserDirectory>;

struct Mocks {
    projects: MockProjectRepository,
    todos: MockTodoRepository,
    tags: MockTagRepository,
    users: MockUserDirectory,
}

impl Mocks {
    fn into_service(self) -> Service {
        ProjectService::new(
            Arc::new(self.projects),
            Arc::new(self.todos),
            Arc::new(self.tags),
            Arc::new(self.users),
        )
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        projects: MockProjectRepository::new(),
        todos: MockTodoRepository::new(),
        tags: MockTagRepository::new(),
        users: MockUserDirectory::new(),
    }
}

fn project() -> Project {
    Project {
        id: PROJECT,
        name: ProjectName::new("Launch").expect("valid name"),
        owner: OWNER,
        members: BTreeSet::from([OWNER, MEMBER]),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn user(id: UserId, username: &str) -> User {
    User {
        id,
        username: username.to_owned(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
    }
}

fn expect_project(mocks: &mut Mocks) {
    mocks
        .projects
        .expect_find_by_id()
        .with(eq(PROJECT))
        .returning(|_| Ok(Some(project())));
}

#[rstest]
#[tokio::test]
async fn create_passes_actor_as_owner(mut mocks: Mocks) {
    mocks
        .projects
        .expect_create()
        .withf(|new| new.owner == OWNER && new.name.as_ref() == "Launch")
        .times(1)
        .return_once(|_| Ok(project()));

    let created = mocks
        .into_service()
        .create(OWNER, ProjectName::new("Launch").expect("valid name"))
        .await
        .expect("create succeeds");
    assert!(created.is_member(created.owner));
}

#[rstest]
#[tokio::test]
async fn detail_is_not_found_for_outsiders(mut mocks: Mocks) {
    expect_project(&mut mocks);
    let request = ProjectDetailRequest {
        actor: OUTSIDER,
        project: PROJECT,
        assignees: Vec::new(),
    };

    let err = mocks.into_service().detail(request).await.expect_err("hidden");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn detail_forwards_assignee_filter(mut mocks: Mocks) {
    expect_project(&mut mocks);
    mocks
        .users
        .expect_find_many()
        .returning(|ids| Ok(ids.iter().map(|id| user(*id, "u")).collect()));
    mocks
        .todos
        .expect_list_by_project()
        .withf(|project, assignees| *project == PROJECT && assignees.to_vec() == vec![MEMBER])
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));
    mocks
        .tags
        .expect_list_by_project()
        .return_once(|_| Ok(Vec::new()));
    let request = ProjectDetailRequest {
        actor: MEMBER,
        project: PROJECT,
        assignees: vec![MEMBER],
    };

    let detail = mocks.into_service().detail(request).await.expect("detail");
    assert_eq!(detail.members.len(), 2);
}

#[rstest]
#[tokio::test]
async fn only_owner_may_delete(mut mocks: Mocks) {
    expect_project(&mut mocks);
    mocks.projects.expect_delete().never();

    let err = mocks
        .into_service()
        .delete(MEMBER, PROJECT)
        .await
        .expect_err("member cannot delete");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn owner_deletes_project(mut mocks: Mocks) {
    expect_project(&mut mocks);
    mocks
        .projects
        .expect_delete()
        .with(eq(PROJECT))
        .times(1)
        .return_once(|_| Ok(true));

    mocks
        .into_service()
        .delete(OWNER, PROJECT)
        .await
        .expect("owner deletes");
}

#[rstest]
#[tokio::test]
async fn invite_rejects_empty_list(mocks: Mocks) {
    let request = InviteMembersRequest {
        actor: OWNER,
        project: PROJECT,
        users: Vec::new(),
    };
    let err = mocks
        .into_service()
        .invite_members(request)
        .await
        .expect_err("empty list");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn invite_rejects_unknown_users_without_writing(mut mocks: Mocks) {
    expect_project(&mut mocks);
    mocks
        .users
        .expect_find_many()
        .return_once(|_| Ok(vec![user(OUTSIDER, "carol")]));
    mocks.projects.expect_add_members().never();
    let request = InviteMembersRequest {
        actor: OWNER,
        project: PROJECT,
        users: vec![OUTSIDER, UserId::new(99)],
    };

    let err = mocks
        .into_service()
        .invite_members(request)
        .await
        .expect_err("unknown user");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn invite_adds_distinct_users(mut mocks: Mocks) {
    expect_project(&mut mocks);
    mocks
        .users
        .expect_find_many()
        .withf(|ids| ids.to_vec() == vec![OUTSIDER])
        .return_once(|_| Ok(vec![user(OUTSIDER, "carol")]));
    mocks
        .projects
        .expect_add_members()
        .withf(|project, users| *project == PROJECT && users.to_vec() == vec![OUTSIDER])
        .times(1)
        .return_once(|_, _| Ok(()));
    let request = InviteMembersRequest {
        actor: MEMBER,
        project: PROJECT,
        users: vec![OUTSIDER, OUTSIDER],
    };

    let added = mocks
        .into_service()
        .invite_members(request)
        .await
        .expect("invite succeeds");
    assert_eq!(added, vec![user(OUTSIDER, "carol")]);
}

#[rstest]
#[case(OWNER, "alice")]
#[case(OUTSIDER, "carol")]
#[tokio::test]
async fn remove_rejects_owner_and_non_members(
    mut mocks: Mocks,
    #[case] target: UserId,
    #[case] username: &'static str,
) {
    expect_project(&mut mocks);
    mocks
        .users
        .expect_find_by_username()
        .return_once(move |_| Ok(Some(user(target, username))));
    mocks.projects.expect_remove_member().never();
    let request = RemoveMemberRequest {
        actor: OWNER,
        project: PROJECT,
        username: username.to_owned(),
    };

    let err = mocks
        .into_service()
        .remove_member(request)
        .await
        .expect_err("not removable");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn remove_rejects_unknown_username(mut mocks: Mocks) {
    expect_project(&mut mocks);
    mocks
        .users
        .expect_find_by_username()
        .return_once(|_| Ok(None));
    let request = RemoveMemberRequest {
        actor: OWNER,
        project: PROJECT,
        username: "ghost".to_owned(),
    };

    let err = mocks
        .into_service()
        .remove_member(request)
        .await
        .expect_err("unknown user");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn remove_member_returns_removed_user(mut mocks: Mocks) {
    expect_project(&mut mocks);
    mocks
        .users
        .expect_find_by_username()
        .return_once(|_| Ok(Some(user(MEMBER, "bob"))));
    mocks
        .projects
        .expect_remove_member()
        .with(eq(PROJECT), eq(MEMBER))
        .times(1)
        .return_once(|_, _| Ok(()));
    let request = RemoveMemberRequest {
        actor: OWNER,
        project: PROJECT,
        username: "bob".to_owned(),
    };

    let removed = mocks
        .into_service()
        .remove_member(request)
        .await
        .expect("removal succeeds");
    assert_eq!(removed.id, MEMBER);
}

#[rstest]
#[tokio::test]
async fn connection_failures_are_service_unavailable(mut mocks: Mocks) {
    mocks
        .projects
        .expect_list_for_member()
        .return_once(|_| Err(ProjectRepositoryError::connection("refused")));

    let err = mocks.into_service().list(OWNER).await.expect_err("db down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
