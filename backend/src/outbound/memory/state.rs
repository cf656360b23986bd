//! Shared state behind the in-memory store.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::{
    Comment, CommentId, Project, ProjectId, Tag, TagId, Todo, TodoId, User, UserId,
};

/// Mutex-guarded tables with per-table id sequences.
#[derive(Debug, Default)]
pub(super) struct State {
    sequence: i64,
    pub(super) users: BTreeMap<UserId, User>,
    pub(super) projects: BTreeMap<ProjectId, Project>,
    pub(super) tags: BTreeMap<TagId, Tag>,
    pub(super) todos: BTreeMap<TodoId, Todo>,
    pub(super) comments: BTreeMap<CommentId, Comment>,
}

impl State {
    /// Next identifier; shared across tables so ids are never reused.
    pub(super) fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    pub(super) fn is_member(&self, project: ProjectId, user: UserId) -> bool {
        self.projects
            .get(&project)
            .is_some_and(|project| project.is_member(user))
    }

    /// Remove a todo and every comment on it.
    pub(super) fn remove_todo(&mut self, id: TodoId) -> bool {
        self.comments.retain(|_, comment| comment.todo != id);
        self.todos.remove(&id).is_some()
    }
}

/// In-process implementation of the driven ports.
///
/// # Examples
/// ```
/// use taskboard::outbound::memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// # let _ = store;
/// ```
pub struct InMemoryStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl InMemoryStore {
    /// Create an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Create an empty store stamping rows with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    pub(super) fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Lock the state; a poisoned lock is reported as a message for the
    /// caller's port error.
    pub(super) fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
