//! Builders wiring domain services over the configured entity store.

use std::sync::Arc;

use actix_web::web;
use taskboard::domain::ports::{
    CommentRepository, LoginService, ProjectRepository, TagRepository, TodoRepository,
    UserDirectory,
};
use taskboard::domain::{CommentService, ProjectService, TagService, TodoService};
use taskboard::inbound::http::state::HttpState;
use taskboard::outbound::memory::{DevLoginService, InMemoryStore};
use taskboard::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselProjectRepository, DieselTagRepository,
    DieselTodoRepository, DieselUserDirectory,
};
use tracing::info;

use super::ServerConfig;

/// One store per driven port. The services share them.
struct Stores<P, T, G, C, U> {
    projects: Arc<P>,
    todos: Arc<T>,
    tags: Arc<G>,
    comments: Arc<C>,
    users: Arc<U>,
}

impl<P, T, G, C, U> Stores<P, T, G, C, U>
where
    P: ProjectRepository + 'static,
    T: TodoRepository + 'static,
    G: TagRepository + 'static,
    C: CommentRepository + 'static,
    U: UserDirectory + 'static,
{
    fn into_http_state(self, login: Arc<dyn LoginService>) -> HttpState {
        let Self {
            projects,
            todos,
            tags,
            comments,
            users,
        } = self;
        HttpState {
            projects: Arc::new(ProjectService::new(
                projects.clone(),
                todos.clone(),
                tags.clone(),
                users.clone(),
            )),
            tags: Arc::new(TagService::new(tags.clone(), projects.clone())),
            todos: Arc::new(TodoService::new(todos.clone(), projects.clone(), tags)),
            comments: Arc::new(CommentService::new(comments, todos, projects)),
            login,
            users,
        }
    }
}

fn memory_state() -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    let login = Arc::new(DevLoginService::new(store.clone()));
    Stores {
        projects: store.clone(),
        todos: store.clone(),
        tags: store.clone(),
        comments: store.clone(),
        users: store,
    }
    .into_http_state(login)
}

fn diesel_state(pool: &DbPool) -> HttpState {
    let users = Arc::new(DieselUserDirectory::new(pool.clone()));
    let login = Arc::new(DevLoginService::new(users.clone()));
    Stores {
        projects: Arc::new(DieselProjectRepository::new(pool.clone())),
        todos: Arc::new(DieselTodoRepository::new(pool.clone())),
        tags: Arc::new(DieselTagRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        users,
    }
    .into_http_state(login)
}

/// HTTP state over the Diesel store when a pool is configured, otherwise
/// over a fresh in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "wiring entity store");
            diesel_state(pool)
        }
        None => {
            info!(store = "memory", "wiring entity store");
            memory_state()
        }
    };
    web::Data::new(state)
}
