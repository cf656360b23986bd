//! Ordering engine.
//!
//! New todos are appended after the highest order in their project. A reorder
//! request renumbers exactly the submitted todos to `0..N-1` in submission
//! order; storage applies the resulting plan in a single transaction.

use std::collections::HashSet;
use std::fmt;

use super::TodoId;

/// Order assigned to a todo created in a project whose highest order is
/// `current_max` (`None` when the project has no todos).
///
/// # Examples
/// ```
/// use taskboard::domain::ordering::next_order;
///
/// assert_eq!(next_order(None), 0);
/// assert_eq!(next_order(Some(4)), 5);
/// ```
#[must_use]
pub fn next_order(current_max: Option<u32>) -> u32 {
    current_max.map_or(0, |max| max.saturating_add(1))
}

/// Rejected reorder input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderError {
    /// The same todo appears twice.
    DuplicateId { id: TodoId },
    /// More positions than an order value can hold.
    TooLong,
}

impl fmt::Display for ReorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "todo {id} appears more than once"),
            Self::TooLong => write!(f, "too many todos in one reorder"),
        }
    }
}

impl std::error::Error for ReorderError {}

/// Validated reorder request: distinct todo ids in their new order.
///
/// # Examples
/// ```
/// use taskboard::domain::{ordering::ReorderPlan, TodoId};
///
/// let plan = ReorderPlan::from_sequence([3, 1, 2].map(TodoId::new)).expect("distinct ids");
/// let pairs: Vec<_> = plan.assignments().collect();
/// assert_eq!(pairs[0], (TodoId::new(3), 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderPlan {
    ids: Vec<TodoId>,
}

impl ReorderPlan {
    /// Build a plan, rejecting repeated ids.
    pub fn from_sequence(ids: impl IntoIterator<Item = TodoId>) -> Result<Self, ReorderError> {
        let ids: Vec<TodoId> = ids.into_iter().collect();
        if u32::try_from(ids.len()).is_err() {
            return Err(ReorderError::TooLong);
        }
        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(id) = ids.iter().find(|id| !seen.insert(**id)) {
            return Err(ReorderError::DuplicateId { id: *id });
        }
        Ok(Self { ids })
    }

    /// Todo ids in their new order.
    #[must_use]
    pub fn ids(&self) -> &[TodoId] {
        &self.ids
    }

    /// Number of todos touched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the plan touches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `(todo, new order)` pairs, orders counting up from zero.
    pub fn assignments(&self) -> impl Iterator<Item = (TodoId, u32)> + '_ {
        // Length was bounded by u32::MAX at construction.
        self.ids.iter().copied().zip(0_u32..)
    }
}
