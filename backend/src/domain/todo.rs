//! Todos: prioritised, tagged, assignable work items inside a project.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ProjectId, TagId, TodoId, UserId};

/// Maximum todo title length in characters.
pub const TODO_TITLE_MAX: usize = 255;

/// Validation errors for [`TodoTitle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoTitleError {
    /// Title was blank once trimmed.
    Empty,
    /// Title exceeded [`TODO_TITLE_MAX`] characters.
    TooLong { max: usize },
}

impl fmt::Display for TodoTitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "title must not be empty"),
            Self::TooLong { max } => write!(f, "title must be at most {max} characters"),
        }
    }
}

impl std::error::Error for TodoTitleError {}

/// Trimmed, non-empty todo title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Write release notes")]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Validate and construct a title.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TodoTitleError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TodoTitleError::Empty);
        }
        if trimmed.chars().count() > TODO_TITLE_MAX {
            return Err(TodoTitleError::TooLong {
                max: TODO_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TodoTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<TodoTitle> for String {
    fn from(value: TodoTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for TodoTitle {
    type Error = TodoTitleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Todo priority.
///
/// Serialises as `"high" | "medium" | "low"`; the single-letter storage codes
/// `H`, `M` and `L` are accepted on input.
///
/// # Examples
/// ```
/// use taskboard::domain::Priority;
///
/// let parsed: Priority = serde_json::from_str("\"H\"").expect("legacy code");
/// assert_eq!(parsed, Priority::High);
/// assert_eq!(Priority::default(), Priority::Medium);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Urgent.
    #[serde(alias = "H")]
    High,
    /// Default priority.
    #[default]
    #[serde(alias = "M")]
    Medium,
    /// Can wait.
    #[serde(alias = "L")]
    Low,
}

impl Priority {
    /// Single-letter storage code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::High => "H",
            Self::Medium => "M",
            Self::Low => "L",
        }
    }

    /// Parse a storage code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "H" => Some(Self::High),
            "M" => Some(Self::Medium),
            "L" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Stored todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Identifier.
    pub id: TodoId,
    /// Title.
    pub title: TodoTitle,
    /// Free text, possibly empty.
    pub description: String,
    /// Priority.
    pub priority: Priority,
    /// Tags, all from `project`.
    #[schema(value_type = Vec<i64>)]
    pub tags: BTreeSet<TagId>,
    /// Assignees, all members of `project`.
    #[schema(value_type = Vec<i64>)]
    pub assignees: BTreeSet<UserId>,
    /// Owning project; immutable.
    pub project: ProjectId,
    /// Manual position, assigned by the ordering engine.
    pub order: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a todo. The order is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    /// Title.
    pub title: TodoTitle,
    /// Free text.
    pub description: String,
    /// Priority.
    pub priority: Priority,
    /// Tags.
    pub tags: BTreeSet<TagId>,
    /// Assignees.
    pub assignees: BTreeSet<UserId>,
    /// Owning project.
    pub project: ProjectId,
}

/// Partial todo update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    /// Replacement title.
    pub title: Option<TodoTitle>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement priority.
    pub priority: Option<Priority>,
    /// Replacement tag set.
    pub tags: Option<BTreeSet<TagId>>,
    /// Replacement assignee set.
    pub assignees: Option<BTreeSet<UserId>>,
    /// Project named by the caller; must match the current one when present.
    pub project: Option<ProjectId>,
}

impl TodoChanges {
    /// Apply the changes to `todo` in place. `project` is never applied.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(tags) = &self.tags {
            todo.tags = tags.clone();
        }
        if let Some(assignees) = &self.assignees {
            todo.assignees = assignees.clone();
        }
    }
}
