//! Task snapshot value type and related task lifecycle types.

use super::{EventId, OwnerId, Subtask, TaskDomainError, TaskId, TaskUpdate};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Category assigned when a task is created without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Task workflow status.
///
/// The set is open-ended: values outside the well-known states are preserved
/// verbatim as [`TaskStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Todo,
    /// Work is under way.
    InProgress,
    /// Work cannot proceed.
    Blocked,
    /// Work is complete.
    Done,
    /// Any other status recorded by a collaborator.
    Other(String),
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Done => "done",
            Self::Other(value) => value,
        }
    }

    /// Returns `true` when the task is complete.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Self::Todo,
            "in_progress" => Self::InProgress,
            "blocked" => Self::Blocked,
            "done" => Self::Done,
            _ => Self::Other(value.trim().to_owned()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority in the inclusive range 1–5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Priority(u8);

impl Priority {
    /// Lowest supported priority.
    pub const MIN: Self = Self(1);
    /// Highest supported priority.
    pub const MAX: Self = Self(5);

    /// Creates a validated priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPriority`] when the value lies
    /// outside 1–5.
    pub fn new(value: i64) -> Result<Self, TaskDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|candidate| (Self::MIN.0..=Self::MAX.0).contains(candidate))
            .map(Self)
            .ok_or(TaskDomainError::InvalidPriority(value))
    }

    /// Creates a priority, saturating out-of-range values into 1–5.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let bounded = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        u8::try_from(bounded).map_or(Self::MIN, Self)
    }

    /// Returns the numeric priority.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<i64> for Priority {
    type Error = TaskDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for i64 {
    fn from(priority: Priority) -> Self {
        Self::from(priority.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable view of a task's field values at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    id: TaskId,
    event_id: EventId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: Priority,
    due_date: Option<NaiveDate>,
    category: String,
    owner: Option<OwnerId>,
    assignee: Option<String>,
    subtasks: Vec<Subtask>,
    tags: BTreeSet<String>,
    created_at: DateTime<Utc>,
    last_update_at: Option<DateTime<Utc>>,
    deleted: bool,
}

/// Parameter object for reconstructing a persisted task snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Planning event the task belongs to.
    pub event_id: EventId,
    /// Task title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: TaskStatus,
    /// Priority in 1–5.
    pub priority: Priority,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Grouping category.
    pub category: String,
    /// Optional owning person.
    pub owner: Option<OwnerId>,
    /// Optional free-text assignee name.
    pub assignee: Option<String>,
    /// Ordered subtask checklist.
    pub subtasks: Vec<Subtask>,
    /// Tag set.
    pub tags: BTreeSet<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the latest update, if any.
    pub last_update_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub deleted: bool,
}

/// Request data for a brand new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    event_id: EventId,
    title: String,
    description: Option<String>,
    priority: Priority,
    due_date: Option<NaiveDate>,
    category: Option<String>,
    owner: Option<OwnerId>,
    assignee: Option<String>,
    subtasks: Vec<Subtask>,
}

impl NewTask {
    /// Creates a request with the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(event_id: EventId, title: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            event_id,
            title: trimmed.to_owned(),
            description: None,
            priority: Priority::default(),
            due_date: None,
            category: None,
            owner: None,
            assignee: None,
            subtasks: Vec::new(),
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
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

    /// Sets the initial subtask checklist.
    #[must_use]
    pub fn with_subtasks(mut self, subtasks: Vec<Subtask>) -> Self {
        self.subtasks = subtasks;
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the initial checklist.
    #[must_use]
    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }
}

impl TaskSnapshot {
    /// Creates a new task in the `todo` state.
    #[must_use]
    pub fn create(request: NewTask, clock: &impl Clock) -> Self {
        let category = request
            .category
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());

        Self {
            id: TaskId::new(),
            event_id: request.event_id,
            title: request.title,
            description: request.description,
            status: TaskStatus::Todo,
            priority: request.priority,
            due_date: request.due_date,
            category,
            owner: request.owner,
            assignee: request.assignee,
            subtasks: request.subtasks,
            tags: BTreeSet::new(),
            created_at: clock.utc(),
            last_update_at: None,
            deleted: false,
        }
    }

    /// Reconstructs a snapshot from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            event_id: data.event_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            category: data.category,
            owner: data.owner,
            assignee: data.assignee,
            subtasks: data.subtasks,
            tags: data.tags,
            created_at: data.created_at,
            last_update_at: data.last_update_at,
            deleted: data.deleted,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning planning event.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the owner, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    /// Returns the free-text assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the ordered subtask checklist.
    #[must_use]
    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    /// Returns the tag set.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp, if the task was ever updated.
    #[must_use]
    pub const fn last_update_at(&self) -> Option<DateTime<Utc>> {
        self.last_update_at
    }

    /// Returns the moment the task was last touched.
    #[must_use]
    pub fn last_touched_at(&self) -> DateTime<Utc> {
        self.last_update_at.unwrap_or(self.created_at)
    }

    /// Returns `true` when the task has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Marks the task as soft-deleted.
    pub const fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    /// Produces the snapshot that results from applying a partial update.
    ///
    /// Only fields present in `update` are overwritten; a blank title or
    /// category is ignored. The update timestamp is always refreshed.
    #[must_use]
    pub fn merged(&self, update: &TaskUpdate, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        if let Some(title) = update.title().filter(|value| !value.trim().is_empty()) {
            title.clone_into(&mut next.title);
        }
        if let Some(description) = update.description() {
            next.description = Some(description.to_owned());
        }
        if let Some(status) = update.status() {
            next.status = status.clone();
        }
        if let Some(priority) = update.priority() {
            next.priority = priority;
        }
        if let Some(due_date) = update.due_date() {
            next.due_date = Some(due_date);
        }
        if let Some(category) = update.category().filter(|value| !value.trim().is_empty()) {
            category.clone_into(&mut next.category);
        }
        if let Some(owner) = update.owner() {
            next.owner = Some(owner);
        }
        if let Some(assignee) = update.assignee() {
            next.assignee = Some(assignee.to_owned());
        }
        if let Some(subtasks) = update.subtasks() {
            next.subtasks = subtasks.to_vec();
        }
        next.last_update_at = Some(now);
        next
    }
}
