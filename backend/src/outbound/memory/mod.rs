//! In-process entity store.
//!
//! [`InMemoryStore`] implements every driven port over one mutex-guarded
//! state, so each multi-row operation is all-or-nothing. The server uses it
//! when no database URL is configured; tests use it as a real adapter.

mod comments;
mod login;
mod projects;
mod state;
mod tags;
mod todos;
mod users;

pub use login::DevLoginService;
pub use state::InMemoryStore;

#[cfg(test)]
mod tests;
