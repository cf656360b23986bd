//! Cross-entity validation for todos.
//!
//! Tags and assignees attached to a todo must stay inside the todo's project,
//! and only members may create todos there.

use std::collections::BTreeSet;
use std::fmt;

use super::{Project, Tag, TagId, UserId};

/// A relational reference that escapes the todo's project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossEntityError {
    /// The tag belongs to another project.
    ForeignTag { tag: TagId },
    /// The user is not a member of the project.
    NonMemberAssignee { user: UserId },
    /// The acting user is not a member of the project.
    CreatorNotMember,
}

impl CrossEntityError {
    /// Payload field the failure refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::ForeignTag { .. } => "tags",
            Self::NonMemberAssignee { .. } => "assignees",
            Self::CreatorNotMember => "project",
        }
    }

    /// Machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ForeignTag { .. } => "tag_outside_project",
            Self::NonMemberAssignee { .. } => "assignee_not_member",
            Self::CreatorNotMember => "not_a_member",
        }
    }
}

impl fmt::Display for CrossEntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignTag { .. } => {
                write!(f, "Can't set a tag that doesn't belong to the project!")
            }
            Self::NonMemberAssignee { .. } => {
                write!(f, "Can't assign someone who isn't a project member!")
            }
            Self::CreatorNotMember => write!(f, "Must be a member of the project!"),
        }
    }
}

impl std::error::Error for CrossEntityError {}

/// Every tag must belong to `project`.
pub fn validate_tags<'a>(
    project: &Project,
    tags: impl IntoIterator<Item = &'a Tag>,
) -> Result<(), CrossEntityError> {
    match tags.into_iter().find(|tag| tag.project != project.id) {
        Some(tag) => Err(CrossEntityError::ForeignTag { tag: tag.id }),
        None => Ok(()),
    }
}

/// Every assignee must be a current member of `project`.
pub fn validate_assignees(
    project: &Project,
    assignees: &BTreeSet<UserId>,
) -> Result<(), CrossEntityError> {
    match assignees.iter().find(|user| !project.is_member(**user)) {
        Some(user) => Err(CrossEntityError::NonMemberAssignee { user: *user }),
        None => Ok(()),
    }
}

/// The creating user must be a member of `project`.
pub fn validate_creator(project: &Project, actor: UserId) -> Result<(), CrossEntityError> {
    if project.is_member(actor) {
        Ok(())
    } else {
        Err(CrossEntityError::CreatorNotMember)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{ProjectId, ProjectName, TagName};

    #[fixture]
    fn project() -> Project {
        Project {
            id: ProjectId::new(1),
            name: ProjectName::new("A").expect("valid name"),
            owner: UserId::new(1),
            members: BTreeSet::from([UserId::new(1), UserId::new(2)]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tag(id: i64, project: i64) -> Tag {
        Tag {
            id: TagId::new(id),
            name: TagName::new(format!("tag-{id}")).expect("valid name"),
            project: ProjectId::new(project),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn tags_from_same_project_pass(project: Project) {
        let tags = [tag(1, 1), tag(2, 1)];
        assert_eq!(validate_tags(&project, &tags), Ok(()));
    }

    #[rstest]
    fn tag_from_other_project_is_rejected(project: Project) {
        let tags = [tag(1, 1), tag(7, 2)];
        let err = validate_tags(&project, &tags).expect_err("foreign tag");
        assert_eq!(err, CrossEntityError::ForeignTag { tag: TagId::new(7) });
        assert_eq!(err.field(), "tags");
    }

    #[rstest]
    #[case(&[1, 2], None)]
    #[case(&[], None)]
    #[case(&[1, 3], Some(3))]
    fn assignee_membership(project: Project, #[case] ids: &[i64], #[case] rejected: Option<i64>) {
        let assignees = ids.iter().copied().map(UserId::new).collect();
        let expected = rejected.map(|id| CrossEntityError::NonMemberAssignee {
            user: UserId::new(id),
        });
        assert_eq!(validate_assignees(&project, &assignees).err(), expected);
    }

    #[rstest]
    fn creator_must_be_member(project: Project) {
        assert!(validate_creator(&project, UserId::new(2)).is_ok());
        let err = validate_creator(&project, UserId::new(9)).expect_err("outsider");
        assert_eq!(err.to_string(), "Must be a member of the project!");
    }
}
