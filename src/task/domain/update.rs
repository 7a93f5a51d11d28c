//! Partial task updates and the submitted-form representation they are
//! parsed from.
//!
//! Blank submitted values mean "leave this field unchanged". A field that
//! already holds a value therefore cannot be cleared through an update; this
//! mirrors how the edit form posts every field on each save.

use super::{OwnerId, Priority, Subtask, TaskStatus};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Date format accepted for submitted due dates.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Partial update applied to a task snapshot.
///
/// Each `None` leaves the corresponding field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<OwnerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtasks: Option<Vec<Subtask>>,
}

impl TaskUpdate {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the owner.
    #[must_use]
    pub const fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Sets the free-text assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Replaces the subtask checklist.
    #[must_use]
    pub fn with_subtasks(mut self, subtasks: Vec<Subtask>) -> Self {
        self.subtasks = Some(subtasks);
        self
    }

    /// Returns the new title, if present.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the new description, if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the new status, if present.
    #[must_use]
    pub const fn status(&self) -> Option<&TaskStatus> {
        self.status.as_ref()
    }

    /// Returns the new priority, if present.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the new due date, if present.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the new category, if present.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the new owner, if present.
    #[must_use]
    pub const fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    /// Returns the new assignee, if present.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the replacement checklist, if present.
    #[must_use]
    pub fn subtasks(&self) -> Option<&[Subtask]> {
        self.subtasks.as_deref()
    }

    /// Returns `true` when the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One subtask row as submitted by an edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedSubtask {
    /// Row title; blank rows are dropped.
    pub title: String,
    /// Whether the row's checkbox was ticked.
    pub is_done: bool,
}

impl SubmittedSubtask {
    /// Creates a submitted row.
    #[must_use]
    pub fn new(title: impl Into<String>, is_done: bool) -> Self {
        Self {
            title: title.into(),
            is_done,
        }
    }
}

/// Raw field values received from a task edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdateForm {
    /// Submitted title.
    pub title: Option<String>,
    /// Submitted description.
    pub description: Option<String>,
    /// Submitted status.
    pub status: Option<String>,
    /// Submitted priority.
    pub priority: Option<String>,
    /// Submitted due date in `YYYY-MM-DD` form.
    pub due_date: Option<String>,
    /// Submitted category.
    pub category: Option<String>,
    /// Submitted owner UUID.
    pub owner_id: Option<String>,
    /// Submitted assignee name.
    pub assignee: Option<String>,
    /// Submitted subtask rows, in form order.
    pub subtasks: Vec<SubmittedSubtask>,
}

impl TaskUpdateForm {
    /// Converts the raw form into a partial update.
    ///
    /// Blank values are treated as absent. Priorities are clamped into 1–5;
    /// unparseable priorities, dates, and owner identifiers are ignored.
    /// Manually submitted subtask rows keep their order; an empty checklist
    /// leaves the stored checklist unchanged.
    #[must_use]
    pub fn into_update(self) -> TaskUpdate {
        let manual = manual_subtasks(&self.subtasks);
        TaskUpdate {
            title: non_blank(self.title),
            description: non_blank(self.description),
            status: non_blank(self.status).map(TaskStatus::from),
            priority: non_blank(self.priority)
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .map(Priority::clamped),
            due_date: non_blank(self.due_date)
                .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT).ok()),
            category: non_blank(self.category),
            owner: non_blank(self.owner_id)
                .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
                .map(OwnerId::from_uuid),
            assignee: non_blank(self.assignee),
            subtasks: (!manual.is_empty()).then_some(manual),
        }
    }
}

/// Collects non-blank submitted rows in order.
#[must_use]
pub fn manual_subtasks(rows: &[SubmittedSubtask]) -> Vec<Subtask> {
    rows.iter()
        .filter(|row| !row.title.trim().is_empty())
        .map(|row| Subtask::new(row.title.clone(), row.is_done))
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}
