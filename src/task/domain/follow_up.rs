//! Assignee follow-up reminders derived from due dates.

use super::{TaskId, TaskSnapshot};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

const NUDGE_WINDOW_DAYS: i64 = 2;

/// Why an assignee should be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FollowUpKind {
    /// The due date has passed.
    Overdue,
    /// The task is due within the nudge window.
    DueSoon {
        /// Whole days left until the due date.
        days: i64,
    },
}

/// A suggested nudge for a task's assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    /// Task needing attention.
    pub task_id: TaskId,
    /// Task title.
    pub title: String,
    /// Free-text assignee to contact.
    pub assignee: String,
    /// Reminder kind.
    pub kind: FollowUpKind,
}

/// Lists reminders for assigned tasks that are overdue or due within two
/// days, preserving input order.
///
/// Days until the due date (00:00 UTC) are truncated toward zero, so a task
/// due earlier today counts as due in zero days rather than overdue. Tasks
/// without a due date or without an assignee are skipped.
#[must_use]
pub fn follow_ups<'a>(
    tasks: impl IntoIterator<Item = &'a TaskSnapshot>,
    now: DateTime<Utc>,
) -> Vec<FollowUp> {
    tasks
        .into_iter()
        .filter_map(|task| {
            let due_date = task.due_date()?;
            let assignee = task.assignee().filter(|name| !name.trim().is_empty())?;
            let days_until = (due_date.and_time(NaiveTime::MIN).and_utc() - now).num_days();
            let kind = if days_until < 0 {
                FollowUpKind::Overdue
            } else if days_until <= NUDGE_WINDOW_DAYS {
                FollowUpKind::DueSoon { days: days_until }
            } else {
                return None;
            };
            Some(FollowUp {
                task_id: task.id(),
                title: task.title().to_owned(),
                assignee: assignee.to_owned(),
                kind,
            })
        })
        .collect()
}
