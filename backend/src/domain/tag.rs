//! Project-scoped tags.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ProjectId, TagId};

/// Maximum tag name length in characters.
pub const TAG_NAME_MAX: usize = 150;

/// Validation errors for [`TagName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagNameError {
    /// Name was blank once trimmed.
    Empty,
    /// Name exceeded [`TAG_NAME_MAX`] characters.
    TooLong { max: usize },
}

impl fmt::Display for TagNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "tag name must not be empty"),
            Self::TooLong { max } => write!(f, "tag name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for TagNameError {}

/// Trimmed, non-empty tag name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "bug")]
pub struct TagName(String);

impl TagName {
    /// Validate and construct a tag name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TagNameError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TagNameError::Empty);
        }
        if trimmed.chars().count() > TAG_NAME_MAX {
            return Err(TagNameError::TooLong { max: TAG_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<TagName> for String {
    fn from(value: TagName) -> Self {
        value.0
    }
}

impl TryFrom<String> for TagName {
    type Error = TagNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored tag. `(name, project)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Identifier.
    pub id: TagId,
    /// Name, unique within the project.
    pub name: TagName,
    /// Owning project.
    pub project: ProjectId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    /// Name.
    pub name: TagName,
    /// Owning project.
    pub project: ProjectId,
}

/// Partial tag update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagChanges {
    /// Replacement name.
    pub name: Option<TagName>,
    /// Replacement owning project.
    pub project: Option<ProjectId>,
}
