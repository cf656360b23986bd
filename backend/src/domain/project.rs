//! Projects: the unit of membership.
//!
//! A project owns its tags and todos. The owner is recorded at creation, never
//! changes, and is always part of the member set.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ProjectId, Tag, Todo, User, UserId};

/// Maximum project name length in characters.
pub const PROJECT_NAME_MAX: usize = 50;

/// Validation errors for [`ProjectName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectNameError {
    /// Name was blank once trimmed.
    Empty,
    /// Name exceeded [`PROJECT_NAME_MAX`] characters.
    TooLong { max: usize },
}

impl fmt::Display for ProjectNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "project name must not be empty"),
            Self::TooLong { max } => write!(f, "project name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for ProjectNameError {}

/// Trimmed, non-empty project name of at most [`PROJECT_NAME_MAX`] characters.
///
/// # Examples
/// ```
/// use taskboard::domain::ProjectName;
///
/// let name = ProjectName::new("  Launch ").expect("valid name");
/// assert_eq!(name.as_ref(), "Launch");
/// assert!(ProjectName::new(" ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Launch")]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate and construct a project name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProjectNameError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProjectNameError::Empty);
        }
        if trimmed.chars().count() > PROJECT_NAME_MAX {
            return Err(ProjectNameError::TooLong {
                max: PROJECT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ProjectName> for String {
    fn from(value: ProjectName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ProjectName {
    type Error = ProjectNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored project with its member set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: ProjectName,
    /// Creator; immutable.
    pub owner: UserId,
    /// Member set, always containing `owner`.
    pub members: BTreeSet<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Whether `user` belongs to the member set.
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    /// Whether `user` created the project.
    #[must_use]
    pub fn is_owner(&self, user: UserId) -> bool {
        self.owner == user
    }
}

/// Fields needed to create a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Display name.
    pub name: ProjectName,
    /// Creator, who becomes owner and first member.
    pub owner: UserId,
}

/// Project together with its members, todos and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetail {
    /// The project itself.
    pub project: Project,
    /// Member records ordered by id.
    pub members: Vec<User>,
    /// Todos, optionally filtered by assignee.
    pub todos: Vec<Todo>,
    /// Tags ordered by id.
    pub tags: Vec<Tag>,
}
