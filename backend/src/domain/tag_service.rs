//! Tag use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{ProjectRepository, TagOperations, TagRepository};
use crate::domain::service_support::{map_project_error, map_tag_error, referenced_project};
use crate::domain::{Error, NewTag, Project, ProjectId, Tag, TagChanges, TagId, UserId};

/// Tag service implementing [`TagOperations`].
#[derive(Clone)]
pub struct TagService<G: ?Sized, P: ?Sized> {
    tags: Arc<G>,
    projects: Arc<P>,
}

impl<G, P> TagService<G, P> {
    /// Create a new service over the given stores.
    pub fn new(tags: Arc<G>, projects: Arc<P>) -> Self {
        Self { tags, projects }
    }
}

fn not_a_member() -> Error {
    Error::invalid_request("Must be a member of the project!")
        .with_details(json!({"field": "project", "code": "not_a_member"}))
}

fn tag_not_found(id: TagId) -> Error {
    Error::not_found(format!("tag {id} not found"))
}

impl<G, P> TagService<G, P>
where
    G: TagRepository + ?Sized,
    P: ProjectRepository + ?Sized,
{
    /// Project named in a payload, which the actor must belong to.
    async fn member_project(&self, actor: UserId, id: ProjectId) -> Result<Project, Error> {
        let project = referenced_project(&*self.projects, id).await?;
        if project.is_member(actor) {
            Ok(project)
        } else {
            Err(not_a_member())
        }
    }

    async fn visible_tag(&self, actor: UserId, id: TagId) -> Result<Tag, Error> {
        let tag = self
            .tags
            .find_by_id(id)
            .await
            .map_err(map_tag_error)?
            .ok_or_else(|| tag_not_found(id))?;
        let visible = self
            .projects
            .find_by_id(tag.project)
            .await
            .map_err(map_project_error)?
            .is_some_and(|project| project.is_member(actor));
        if visible { Ok(tag) } else { Err(tag_not_found(id)) }
    }
}

#[async_trait]
impl<G, P> TagOperations for TagService<G, P>
where
    G: TagRepository + ?Sized,
    P: ProjectRepository + ?Sized,
{
    async fn create(&self, actor: UserId, tag: NewTag) -> Result<Tag, Error> {
        self.member_project(actor, tag.project).await?;
        self.tags.create(&tag).await.map_err(map_tag_error)
    }

    async fn list(&self, actor: UserId) -> Result<Vec<Tag>, Error> {
        self.tags.list_for_member(actor).await.map_err(map_tag_error)
    }

    async fn get(&self, actor: UserId, id: TagId) -> Result<Tag, Error> {
        self.visible_tag(actor, id).await
    }

    async fn update(&self, actor: UserId, id: TagId, changes: TagChanges) -> Result<Tag, Error> {
        let current = self.visible_tag(actor, id).await?;
        if let Some(target) = changes.project.filter(|target| *target != current.project) {
            self.member_project(actor, target).await?;
        }
        self.tags
            .update(id, &changes)
            .await
            .map_err(map_tag_error)?
            .ok_or_else(|| tag_not_found(id))
    }

    async fn delete(&self, actor: UserId, id: TagId) -> Result<(), Error> {
        self.visible_tag(actor, id).await?;
        if self.tags.delete(id).await.map_err(map_tag_error)? {
            Ok(())
        } else {
            Err(tag_not_found(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;
    use mockall::predicate::eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockProjectRepository, MockTagRepository, TagRepositoryError};
    use crate::domain::{ErrorCode, ProjectName, TagName};

    const ALICE: UserId = UserId::new(1);
    const CAROL: UserId = UserId::new(3);

    fn project(id: i64, members: &[UserId]) -> Project {
        Project {
            id: ProjectId::new(id),
            name: ProjectName::new("P").expect("valid name"),
            owner: members[0],
            members: members.iter().copied().collect::<BTreeSet<_>>(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tag(name: &str, project: i64) -> Tag {
        Tag {
            id: TagId::new(5),
            name: TagName::new(name).expect("valid name"),
            project: ProjectId::new(project),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn projects_with(entries: Vec<Project>) -> MockProjectRepository {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_find_by_id()
            .returning(move |id| Ok(entries.iter().find(|p| p.id == id).cloned()));
        projects
    }

    fn new_tag(project: i64) -> NewTag {
        NewTag {
            name: TagName::new("bug").expect("valid name"),
            project: ProjectId::new(project),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_requires_membership() {
        let mut tags = MockTagRepository::new();
        tags.expect_create().never();
        let service = TagService::new(
            Arc::new(tags),
            Arc::new(projects_with(vec![project(1, &[ALICE])])),
        );

        let err = service.create(CAROL, new_tag(1)).await.expect_err("outsider");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Must be a member of the project!");
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_unknown_project() {
        let service = TagService::new(
            Arc::new(MockTagRepository::new()),
            Arc::new(projects_with(Vec::new())),
        );

        let err = service.create(ALICE, new_tag(9)).await.expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("project")));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let mut tags = MockTagRepository::new();
        tags.expect_create()
            .return_once(|_| Err(TagRepositoryError::duplicate("bug")));
        let service = TagService::new(
            Arc::new(tags),
            Arc::new(projects_with(vec![project(1, &[ALICE])])),
        );

        let err = service.create(ALICE, new_tag(1)).await.expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.details().and_then(|d| d.get("code")), Some(&json!("duplicate_tag")));
    }

    #[rstest]
    #[tokio::test]
    async fn tags_of_foreign_projects_are_hidden() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_id()
            .with(eq(TagId::new(5)))
            .return_once(|_| Ok(Some(tag("bug", 1))));
        let service = TagService::new(
            Arc::new(tags),
            Arc::new(projects_with(vec![project(1, &[ALICE])])),
        );

        let err = service.get(CAROL, TagId::new(5)).await.expect_err("hidden");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn reparenting_requires_membership_of_target() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_id()
            .return_once(|_| Ok(Some(tag("bug", 1))));
        tags.expect_update().never();
        let service = TagService::new(
            Arc::new(tags),
            Arc::new(projects_with(vec![
                project(1, &[ALICE]),
                project(2, &[CAROL]),
            ])),
        );
        let changes = TagChanges {
            name: None,
            project: Some(ProjectId::new(2)),
        };

        let err = service
            .update(ALICE, TagId::new(5), changes)
            .await
            .expect_err("not a member of target");
        assert_eq!(err.message(), "Must be a member of the project!");
    }

    #[rstest]
    #[tokio::test]
    async fn rename_within_project() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_id()
            .return_once(|_| Ok(Some(tag("bug", 1))));
        tags.expect_update()
            .withf(|id, changes| *id == TagId::new(5) && changes.project.is_none())
            .return_once(|_, _| Ok(Some(tag("defect", 1))));
        let service = TagService::new(
            Arc::new(tags),
            Arc::new(projects_with(vec![project(1, &[ALICE])])),
        );
        let changes = TagChanges {
            name: Some(TagName::new("defect").expect("valid name")),
            project: None,
        };

        let updated = service
            .update(ALICE, TagId::new(5), changes)
            .await
            .expect("rename succeeds");
        assert_eq!(updated.name.as_ref(), "defect");
    }
}
