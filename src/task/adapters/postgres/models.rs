//! Diesel row models for task persistence.

use super::schema::{task_events, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning planning event.
    pub event_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: i32,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Grouping category.
    pub category: String,
    /// Optional owning person.
    pub owner_id: Option<uuid::Uuid>,
    /// Optional free-text assignee.
    pub assignee_text: Option<String>,
    /// Optional subtask JSON array.
    pub subtasks: Option<Value>,
    /// Tag set.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub last_update_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub deleted: bool,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning planning event.
    pub event_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: i32,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Grouping category.
    pub category: String,
    /// Optional owning person.
    pub owner_id: Option<uuid::Uuid>,
    /// Optional free-text assignee.
    pub assignee_text: Option<String>,
    /// Optional subtask JSON array.
    pub subtasks: Option<Value>,
    /// Tag set.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub last_update_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub deleted: bool,
}

/// Changeset written when a merged snapshot is persisted.
///
/// `None` values are written as SQL `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: i32,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Grouping category.
    pub category: String,
    /// Optional owning person.
    pub owner_id: Option<uuid::Uuid>,
    /// Optional free-text assignee.
    pub assignee_text: Option<String>,
    /// Optional subtask JSON array.
    pub subtasks: Option<Value>,
    /// Tag set.
    pub tags: Vec<String>,
    /// Latest update timestamp.
    pub last_update_at: Option<DateTime<Utc>>,
}

/// Query result row for change events.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskEventRow {
    /// Event identifier.
    pub id: uuid::Uuid,
    /// Affected task.
    pub task_id: uuid::Uuid,
    /// Event type tag.
    pub event_type: String,
    /// JSON array of field changes.
    pub changes: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for change events.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_events)]
pub struct NewTaskEventRow {
    /// Event identifier.
    pub id: uuid::Uuid,
    /// Affected task.
    pub task_id: uuid::Uuid,
    /// Event type tag.
    pub event_type: String,
    /// JSON array of field changes.
    pub changes: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
