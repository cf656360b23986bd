//! Behaviour of the in-memory store as a driven adapter.

use std::collections::BTreeSet;
use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ordering::ReorderPlan;
use crate::domain::ports::{
    CommentRepository, LoginService, MockUserDirectory, ProjectRepository, TagRepository,
    TagRepositoryError, TodoRepository, TodoRepositoryError, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    CommentText, ErrorCode, LoginCredentials, NewComment, NewProject, NewTag, NewTodo, NewUser,
    Priority, Project, ProjectName, Registration, RegistrationInput, TagChanges, TagName, Todo,
    TodoChanges, TodoId, TodoTitle, User, UserId,
};

struct World {
    store: InMemoryStore,
    alice: User,
    bob: User,
    project: Project,
}

async fn user(store: &InMemoryStore, name: &str) -> User {
    UserDirectory::create(
        store,
        &NewUser {
            username: name.to_owned(),
            email: format!("{name}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
        },
    )
    .await
    .expect("user created")
}

async fn todo(store: &InMemoryStore, project: &Project, title: &str) -> Todo {
    TodoRepository::create(
        store,
        &NewTodo {
            title: TodoTitle::new(title).expect("valid title"),
            description: String::new(),
            priority: Priority::default(),
            tags: BTreeSet::new(),
            assignees: BTreeSet::new(),
            project: project.id,
        },
    )
    .await
    .expect("todo created")
}

#[fixture]
async fn world() -> World {
    let store = InMemoryStore::new();
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;
    let project = ProjectRepository::create(
        &store,
        &NewProject {
            name: ProjectName::new("Launch").expect("valid name"),
            owner: alice.id,
        },
    )
    .await
    .expect("project created");
    World {
        store,
        alice,
        bob,
        project,
    }
}

#[rstest]
#[tokio::test]
async fn owner_is_first_member(#[future] world: World) {
    let world = world.await;
    assert_eq!(world.project.members, BTreeSet::from([world.alice.id]));
}

#[rstest]
#[tokio::test]
async fn todos_are_appended_per_project(#[future] world: World) {
    let world = world.await;
    let first = todo(&world.store, &world.project, "one").await;
    let second = todo(&world.store, &world.project, "two").await;
    assert_eq!((first.order, second.order), (0, 1));
}

#[rstest]
#[tokio::test]
async fn reorder_renumbers_in_submission_order(#[future] world: World) {
    let world = world.await;
    let a = todo(&world.store, &world.project, "a").await;
    let b = todo(&world.store, &world.project, "b").await;
    let c = todo(&world.store, &world.project, "c").await;

    let plan = ReorderPlan::from_sequence([c.id, a.id, b.id]).expect("valid plan");
    world.store.reorder(&plan).await.expect("reorder succeeds");

    let listed = TodoRepository::list_by_project(&world.store, world.project.id, &[])
        .await
        .expect("list");
    let ids: Vec<TodoId> = listed.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![c.id, a.id, b.id]);
    assert_eq!(
        listed.iter().map(|t| t.order).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[rstest]
#[tokio::test]
async fn reorder_with_unknown_id_changes_nothing(#[future] world: World) {
    let world = world.await;
    let a = todo(&world.store, &world.project, "a").await;
    let b = todo(&world.store, &world.project, "b").await;
    let ghost = TodoId::new(9_999);

    let plan = ReorderPlan::from_sequence([b.id, ghost, a.id]).expect("valid plan");
    let err = world.store.reorder(&plan).await.expect_err("unknown id");
    assert_eq!(err, TodoRepositoryError::unknown_todo(ghost));

    let after_a = TodoRepository::find_by_id(&world.store, a.id).await.expect("find");
    let after_b = TodoRepository::find_by_id(&world.store, b.id).await.expect("find");
    assert_eq!(after_a.map(|t| t.order), Some(0));
    assert_eq!(after_b.map(|t| t.order), Some(1));
}

#[rstest]
#[tokio::test]
async fn non_members_are_never_written_as_assignees(#[future] world: World) {
    let world = world.await;
    let outsider = BTreeSet::from([world.bob.id]);
    let created = TodoRepository::create(
        &world.store,
        &NewTodo {
            title: TodoTitle::new("Ship").expect("valid title"),
            description: String::new(),
            priority: Priority::default(),
            tags: BTreeSet::new(),
            assignees: outsider.clone(),
            project: world.project.id,
        },
    )
    .await;
    assert_eq!(
        created,
        Err(TodoRepositoryError::non_member_assignee(world.bob.id))
    );

    let existing = todo(&world.store, &world.project, "one").await;
    let changes = TodoChanges {
        title: Some(TodoTitle::new("renamed").expect("valid title")),
        assignees: Some(outsider),
        ..TodoChanges::default()
    };
    let updated = TodoRepository::update(&world.store, existing.id, &changes).await;
    assert_eq!(
        updated,
        Err(TodoRepositoryError::non_member_assignee(world.bob.id))
    );
    let after = TodoRepository::find_by_id(&world.store, existing.id)
        .await
        .expect("find");
    assert_eq!(after, Some(existing));
}

#[rstest]
#[tokio::test]
async fn duplicate_tag_leaves_first_untouched(#[future] world: World) {
    let world = world.await;
    let new_tag = NewTag {
        name: TagName::new("bug").expect("valid name"),
        project: world.project.id,
    };
    let first = TagRepository::create(&world.store, &new_tag).await.expect("first tag");

    let err = TagRepository::create(&world.store, &new_tag)
        .await
        .expect_err("second is a duplicate");
    assert_eq!(err, TagRepositoryError::duplicate("bug"));
    let stored = TagRepository::find_by_id(&world.store, first.id).await.expect("find");
    assert_eq!(stored, Some(first));
}

#[rstest]
#[tokio::test]
async fn renaming_onto_existing_tag_conflicts(#[future] world: World) {
    let world = world.await;
    for name in ["bug", "feature"] {
        TagRepository::create(
            &world.store,
            &NewTag {
                name: TagName::new(name).expect("valid name"),
                project: world.project.id,
            },
        )
        .await
        .expect("tag created");
    }
    let tags = TagRepository::list_by_project(&world.store, world.project.id)
        .await
        .expect("list");
    let feature = tags.iter().find(|t| t.name.as_ref() == "feature").expect("feature tag");

    let changes = TagChanges {
        name: Some(TagName::new("bug").expect("valid name")),
        project: None,
    };
    let err = TagRepository::update(&world.store, feature.id, &changes)
        .await
        .expect_err("rename clashes");
    assert!(matches!(err, TagRepositoryError::Duplicate { .. }));
}

#[rstest]
#[tokio::test]
async fn removing_member_unassigns_their_todos(#[future] world: World) {
    let world = world.await;
    world
        .store
        .add_members(world.project.id, &[world.bob.id])
        .await
        .expect("invite bob");
    let item = todo(&world.store, &world.project, "assigned").await;
    TodoRepository::update(
        &world.store,
        item.id,
        &TodoChanges {
            assignees: Some(BTreeSet::from([world.bob.id])),
            ..TodoChanges::default()
        },
    )
    .await
    .expect("assign bob");

    world
        .store
        .remove_member(world.project.id, world.bob.id)
        .await
        .expect("remove bob");

    let project = ProjectRepository::find_by_id(&world.store, world.project.id)
        .await
        .expect("find")
        .expect("project exists");
    assert!(!project.is_member(world.bob.id));
    let item = TodoRepository::find_by_id(&world.store, item.id)
        .await
        .expect("find")
        .expect("todo exists");
    assert!(item.assignees.is_empty());
}

#[rstest]
#[tokio::test]
async fn assignee_filter_returns_distinct_todos_by_id(#[future] world: World) {
    let world = world.await;
    world
        .store
        .add_members(world.project.id, &[world.bob.id])
        .await
        .expect("invite bob");
    let both = todo(&world.store, &world.project, "both").await;
    let _none = todo(&world.store, &world.project, "none").await;
    let bob_only = todo(&world.store, &world.project, "bob").await;
    for (id, assignees) in [
        (both.id, BTreeSet::from([world.alice.id, world.bob.id])),
        (bob_only.id, BTreeSet::from([world.bob.id])),
    ] {
        TodoRepository::update(
            &world.store,
            id,
            &TodoChanges {
                assignees: Some(assignees),
                ..TodoChanges::default()
            },
        )
        .await
        .expect("assign");
    }

    let filtered = TodoRepository::list_by_project(
        &world.store,
        world.project.id,
        &[world.alice.id, world.bob.id],
    )
    .await
    .expect("filter");
    let ids: Vec<TodoId> = filtered.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![both.id, bob_only.id]);
}

#[rstest]
#[tokio::test]
async fn deleting_project_cascades(#[future] world: World) {
    let world = world.await;
    let item = todo(&world.store, &world.project, "doomed").await;
    let comment = CommentRepository::create(
        &world.store,
        &NewComment {
            todo: item.id,
            author: world.alice.id,
            text: CommentText::new("bye").expect("valid text"),
        },
    )
    .await
    .expect("comment created");

    assert!(ProjectRepository::delete(&world.store, world.project.id).await.expect("delete"));

    assert!(TodoRepository::find_by_id(&world.store, item.id).await.expect("find").is_none());
    assert!(CommentRepository::find_by_id(&world.store, comment.id)
        .await
        .expect("find")
        .is_none());
}

#[rstest]
#[tokio::test]
async fn owners_and_authors_are_protected(#[future] world: World) {
    let world = world.await;
    let err = UserDirectory::delete(&world.store, world.alice.id)
        .await
        .expect_err("owner is protected");
    assert_eq!(err, UserDirectoryError::protected(world.alice.id));

    assert!(UserDirectory::delete(&world.store, world.bob.id).await.expect("delete bob"));
}

#[rstest]
#[tokio::test]
async fn duplicate_username_is_reported(#[future] world: World) {
    let world = world.await;
    let err = UserDirectory::create(
        &world.store,
        &NewUser {
            username: "alice".into(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        },
    )
    .await
    .expect_err("taken");
    assert!(matches!(err, UserDirectoryError::DuplicateUsername { .. }));
}

#[rstest]
#[tokio::test]
async fn dev_login_round_trip() {
    let store = Arc::new(InMemoryStore::new());
    let login = DevLoginService::new(store.clone());
    let user = login.register(&dana_registration()).await.expect("registered");
    let good = LoginCredentials::try_from_parts("dana", "hunter22").expect("credentials");
    let bad = LoginCredentials::try_from_parts("dana", "nope").expect("credentials");

    assert_eq!(login.authenticate(&good).await.expect("login"), user.id);
    let err = login.authenticate(&bad).await.expect_err("wrong password");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Invalid credentials.");
}

fn dana_registration() -> Registration {
    Registration::try_new(RegistrationInput {
        username: "dana",
        email: "dana@example.com",
        first_name: "Dana",
        last_name: "",
        password1: "hunter22",
        password2: "hunter22",
    })
    .expect("valid registration")
}

#[rstest]
#[case::query(UserDirectoryError::query("boom"), ErrorCode::InternalError)]
#[case::connection(UserDirectoryError::connection("down"), ErrorCode::ServiceUnavailable)]
#[case::duplicate(UserDirectoryError::duplicate_username("dana"), ErrorCode::InvalidRequest)]
#[tokio::test]
async fn dev_login_registration_failures_follow_directory_mapping(
    #[case] failure: UserDirectoryError,
    #[case] expected: ErrorCode,
) {
    let mut users = MockUserDirectory::new();
    users
        .expect_create()
        .times(1)
        .return_once(move |_| Err(failure));
    let login = DevLoginService::new(Arc::new(users));

    let err = login
        .register(&dana_registration())
        .await
        .expect_err("directory failure");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[case::query(UserDirectoryError::query("boom"), ErrorCode::InternalError)]
#[case::connection(UserDirectoryError::connection("down"), ErrorCode::ServiceUnavailable)]
#[tokio::test]
async fn dev_login_lookup_failures_follow_directory_mapping(
    #[case] failure: UserDirectoryError,
    #[case] expected: ErrorCode,
) {
    let mut users = MockUserDirectory::new();
    users.expect_create().times(1).returning(|new| {
        Ok(User {
            id: UserId::new(7),
            username: new.username.clone(),
            email: new.email.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
        })
    });
    users
        .expect_find_by_username()
        .times(1)
        .return_once(move |_| Err(failure));
    let login = DevLoginService::new(Arc::new(users));
    login.register(&dana_registration()).await.expect("registered");
    let credentials = LoginCredentials::try_from_parts("dana", "hunter22").expect("credentials");

    let err = login
        .authenticate(&credentials)
        .await
        .expect_err("directory failure");

    assert_eq!(err.code(), expected);
}
