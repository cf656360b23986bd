//! Project use-cases: creation, membership-scoped reads, owner-only deletion
//! and membership changes.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::membership::{self, AccessDenied};
use crate::domain::ports::{
    InviteMembersRequest, ProjectDetailRequest, ProjectOperations, ProjectRepository,
    RemoveMemberRequest, TagRepository, TodoRepository, UserDirectory,
};
use crate::domain::service_support::{
    map_project_error, map_tag_error, map_todo_error, map_user_error, visible_project,
};
use crate::domain::{
    Error, NewProject, Project, ProjectDetail, ProjectId, ProjectName, User, UserId,
};

/// Project service implementing [`ProjectOperations`].
#[derive(Clone)]
pub struct ProjectService<P: ?Sized, T: ?Sized, G: ?Sized, U: ?Sized> {
    projects: Arc<P>,
    todos: Arc<T>,
    tags: Arc<G>,
    users: Arc<U>,
}

impl<P, T, G, U> ProjectService<P, T, G, U> {
    /// Create a new service over the given stores.
    pub fn new(projects: Arc<P>, todos: Arc<T>, tags: Arc<G>, users: Arc<U>) -> Self {
        Self {
            projects,
            todos,
            tags,
            users,
        }
    }
}

fn owner_only(denied: AccessDenied) -> Error {
    Error::forbidden(denied.to_string())
}

#[async_trait]
impl<P, T, G, U> ProjectOperations for ProjectService<P, T, G, U>
where
    P: ProjectRepository + ?Sized,
    T: TodoRepository + ?Sized,
    G: TagRepository + ?Sized,
    U: UserDirectory + ?Sized,
{
    async fn create(&self, actor: UserId, name: ProjectName) -> Result<Project, Error> {
        self.projects
            .create(&NewProject { name, owner: actor })
            .await
            .map_err(map_project_error)
    }

    async fn list(&self, actor: UserId) -> Result<Vec<Project>, Error> {
        self.projects
            .list_for_member(actor)
            .await
            .map_err(map_project_error)
    }

    async fn detail(&self, request: ProjectDetailRequest) -> Result<ProjectDetail, Error> {
        let project = visible_project(&*self.projects, request.actor, request.project).await?;
        let member_ids: Vec<UserId> = project.members.iter().copied().collect();
        let members = self
            .users
            .find_many(&member_ids)
            .await
            .map_err(map_user_error)?;
        let todos = self
            .todos
            .list_by_project(project.id, &request.assignees)
            .await
            .map_err(map_todo_error)?;
        let tags = self
            .tags
            .list_by_project(project.id)
            .await
            .map_err(map_tag_error)?;

        Ok(ProjectDetail {
            project,
            members,
            todos,
            tags,
        })
    }

    async fn delete(&self, actor: UserId, id: ProjectId) -> Result<(), Error> {
        let project = visible_project(&*self.projects, actor, id).await?;
        membership::ensure_owner(&project, actor).map_err(owner_only)?;
        let deleted = self.projects.delete(id).await.map_err(map_project_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("project {id} not found")))
        }
    }

    async fn invite_members(&self, request: InviteMembersRequest) -> Result<Vec<User>, Error> {
        if request.users.is_empty() {
            return Err(Error::invalid_request("users must not be empty")
                .with_details(json!({"field": "users", "code": "required"})));
        }
        let project = visible_project(&*self.projects, request.actor, request.project).await?;

        let wanted: Vec<UserId> = request
            .users
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let found = self
            .users
            .find_many(&wanted)
            .await
            .map_err(map_user_error)?;
        if found.len() != wanted.len() {
            return Err(Error::invalid_request("One or more users do not exist.")
                .with_details(json!({"field": "users", "code": "does_not_exist"})));
        }

        self.projects
            .add_members(project.id, &wanted)
            .await
            .map_err(map_project_error)?;
        Ok(found)
    }

    async fn remove_member(&self, request: RemoveMemberRequest) -> Result<User, Error> {
        let project = visible_project(&*self.projects, request.actor, request.project).await?;
        let member = self
            .users
            .find_by_username(&request.username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                Error::invalid_request("User does not exist.")
                    .with_details(json!({"field": "username", "code": "does_not_exist"}))
            })?;
        membership::ensure_removable(&project, member.id).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({"field": "username", "code": "not_removable"}))
        })?;

        self.projects
            .remove_member(project.id, member.id)
            .await
            .map_err(map_project_error)?;
        Ok(member)
    }
}

#[cfg(test)]
#[path = "project_service_tests.rs"]
mod tests;
