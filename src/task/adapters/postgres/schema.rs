//! Diesel schema for task planning persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning planning event.
        event_id -> Uuid,
        /// Task title.
        title -> Text,
        /// Optional description.
        description -> Nullable<Text>,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority in 1–5.
        priority -> Int4,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Grouping category.
        #[max_length = 100]
        category -> Varchar,
        /// Optional owning person.
        owner_id -> Nullable<Uuid>,
        /// Optional free-text assignee.
        assignee_text -> Nullable<Text>,
        /// Optional JSON array of `{title, is_done}` subtasks.
        subtasks -> Nullable<Jsonb>,
        /// Tag set.
        tags -> Array<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest update timestamp.
        last_update_at -> Nullable<Timestamptz>,
        /// Soft-delete flag.
        deleted -> Bool,
    }
}

diesel::table! {
    /// Append-only task change events.
    task_events (id) {
        /// Event identifier.
        id -> Uuid,
        /// Affected task.
        task_id -> Uuid,
        /// Event type tag.
        #[max_length = 50]
        event_type -> Varchar,
        /// JSON array of field changes.
        changes -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(task_events -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_events);
