//! Domain model for task planning.
//!
//! Holds the canonical [`TaskSnapshot`] value type, partial update merging,
//! field-level change diffing, and risk scoring. Everything here is pure:
//! time is passed in explicitly or through an injected clock.

mod change;
mod diff;
mod error;
mod follow_up;
mod ids;
mod risk;
mod subtask;
mod task;
mod update;

pub use change::{
    ChangeEvent, ChangeEventType, FieldChange, ParseChangeEventTypeError, WatchedField,
};
pub use diff::{ChangeDiffer, DiffPolicy, diff};
pub use error::TaskDomainError;
pub use follow_up::{FollowUp, FollowUpKind, follow_ups};
pub use ids::{ChangeEventId, EventId, OwnerId, TaskId};
pub use risk::{
    REASON_BLOCKED, REASON_DUE_SOON, REASON_OVERDUE, REASON_STALE_LONG, REASON_STALE_SHORT,
    RiskAssessment, RiskLevel, RiskScorer, whole_days_between,
};
pub use subtask::Subtask;
pub use task::{DEFAULT_CATEGORY, NewTask, PersistedTaskData, Priority, TaskSnapshot, TaskStatus};
pub use update::{
    DUE_DATE_FORMAT, SubmittedSubtask, TaskUpdate, TaskUpdateForm, manual_subtasks,
};
