//! Append-only audit records for committed task mutations.

use super::{ChangeEventId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Task fields the change differ can watch, in their declared emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchedField {
    /// Task title.
    Title,
    /// Task description.
    Description,
    /// Workflow status.
    Status,
    /// Priority.
    Priority,
    /// Due date.
    DueDate,
    /// Tag set.
    Tags,
}

impl WatchedField {
    /// Every watchable field in declared order.
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Description,
        Self::Status,
        Self::Priority,
        Self::DueDate,
        Self::Tags,
    ];

    /// Returns the field name used in change payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "due_date",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for WatchedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level difference between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// The changed field.
    pub field: WatchedField,
    /// Previous value; `null` when absent.
    pub from: Value,
    /// New value; `null` when absent.
    pub to: Value,
}

impl FieldChange {
    /// Creates a field change.
    #[must_use]
    pub const fn new(field: WatchedField, from: Value, to: Value) -> Self {
        Self { field, from, to }
    }
}

/// Kind of mutation recorded by a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeEventType {
    /// Fields of an existing task were updated.
    #[serde(rename = "UPDATED")]
    Updated,
}

impl ChangeEventType {
    /// Returns the canonical storage tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "UPDATED",
        }
    }
}

impl TryFrom<&str> for ChangeEventType {
    type Error = ParseChangeEventTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "UPDATED" => Ok(Self::Updated),
            _ => Err(ParseChangeEventTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for ChangeEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing change event types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown change event type: {0}")]
pub struct ParseChangeEventTypeError(pub String);

/// Audit record of the field-level diff produced by one committed mutation.
///
/// Change events are never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    id: ChangeEventId,
    task_id: TaskId,
    event_type: ChangeEventType,
    changes: Vec<FieldChange>,
    created_at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Records an update of `task_id`.
    #[must_use]
    pub fn updated(task_id: TaskId, changes: Vec<FieldChange>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ChangeEventId::new(),
            task_id,
            event_type: ChangeEventType::Updated,
            changes,
            created_at,
        }
    }

    /// Reconstructs an event from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: ChangeEventId,
        task_id: TaskId,
        event_type: ChangeEventType,
        changes: Vec<FieldChange>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            event_type,
            changes,
            created_at,
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn id(&self) -> ChangeEventId {
        self.id
    }

    /// Returns the affected task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the event type.
    #[must_use]
    pub const fn event_type(&self) -> ChangeEventType {
        self.event_type
    }

    /// Returns the recorded field changes.
    #[must_use]
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
