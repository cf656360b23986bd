//! Diesel table definitions. Must mirror `backend/migrations` exactly.

diesel::table! {
    /// Identity rows; credentials live elsewhere.
    users (id) {
        id -> Int8,
        username -> Varchar,
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Projects. `owner_id` is protected against user deletion.
    projects (id) {
        id -> Int8,
        name -> Varchar,
        owner_id -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project membership join rows.
    project_members (project_id, user_id) {
        project_id -> Int8,
        user_id -> Int8,
    }
}

diesel::table! {
    /// Tags, unique per `(name, project_id)`.
    tags (id) {
        id -> Int8,
        name -> Varchar,
        project_id -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Todos with their manual position.
    todos (id) {
        id -> Int8,
        title -> Varchar,
        description -> Text,
        /// Single-letter priority code: `H`, `M` or `L`.
        priority -> Varchar,
        project_id -> Int8,
        #[sql_name = "order"]
        position -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    todo_tags (todo_id, tag_id) {
        todo_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    todo_assignees (todo_id, user_id) {
        todo_id -> Int8,
        user_id -> Int8,
    }
}

diesel::table! {
    /// Comments. `author_id` is protected against user deletion.
    comments (id) {
        id -> Int8,
        todo_id -> Int8,
        author_id -> Int8,
        text -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(projects -> users (owner_id));
diesel::joinable!(project_members -> projects (project_id));
diesel::joinable!(project_members -> users (user_id));
diesel::joinable!(tags -> projects (project_id));
diesel::joinable!(todos -> projects (project_id));
diesel::joinable!(todo_tags -> todos (todo_id));
diesel::joinable!(todo_tags -> tags (tag_id));
diesel::joinable!(todo_assignees -> todos (todo_id));
diesel::joinable!(todo_assignees -> users (user_id));
diesel::joinable!(comments -> todos (todo_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    projects,
    project_members,
    tags,
    todos,
    todo_tags,
    todo_assignees,
    comments,
);
