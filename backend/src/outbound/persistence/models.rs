//! Diesel row structs. Internal to the persistence adapter; the domain only
//! ever sees the converted entities.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{
    comments, project_members, projects, tags, todo_assignees, todo_tags, todos, users,
};
use crate::domain::{
    Comment, CommentId, CommentText, ProjectId, ProjectName, Tag, TagId, TagName, TodoId, User,
    UserId,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRow {
    /// Validated project name; stored rows that fail validation are corrupt.
    pub fn project_name(&self) -> Result<ProjectName, String> {
        ProjectName::new(&self.name)
            .map_err(|err| format!("invalid project name in database: {err}"))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub name: &'a str,
    pub owner_id: i64,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = project_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MemberRow {
    pub project_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
    pub project_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TagRow> for Tag {
    type Error = String;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        let name =
            TagName::new(&row.name).map_err(|err| format!("invalid tag name in database: {err}"))?;
        Ok(Self {
            id: TagId::new(row.id),
            name,
            project: ProjectId::new(row.project_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub name: &'a str,
    pub project_id: i64,
}

/// Partial tag update; `None` columns are left alone.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tags)]
pub(crate) struct TagUpdate<'a> {
    pub name: Option<&'a str>,
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TodoRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub project_id: i64,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub(crate) struct NewTodoRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub priority: &'static str,
    pub project_id: i64,
    pub position: i32,
}

/// Partial todo update; relation sets are rewritten separately.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = todos)]
pub(crate) struct TodoUpdate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub priority: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = todo_tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TodoTagRow {
    pub todo_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = todo_assignees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TodoAssigneeRow {
    pub todo_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub todo_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = String;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        let text = CommentText::new(row.text)
            .map_err(|err| format!("invalid comment text in database: {err}"))?;
        Ok(Self {
            id: CommentId::new(row.id),
            todo: TodoId::new(row.todo_id),
            author: UserId::new(row.author_id),
            text,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub todo_id: i64,
    pub author_id: i64,
    pub text: &'a str,
}
