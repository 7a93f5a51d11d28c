//! Checklist items attached to a task.

use serde::{Deserialize, Serialize};

/// One entry of a task's ordered subtask checklist.
///
/// Persisted as an element of a JSON array of `{title, is_done}` objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subtask {
    /// Short actionable description.
    pub title: String,
    /// Completion flag.
    #[serde(default)]
    pub is_done: bool,
}

impl Subtask {
    /// Creates an open subtask.
    #[must_use]
    pub fn open(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_done: false,
        }
    }

    /// Creates a subtask with an explicit completion flag.
    #[must_use]
    pub fn new(title: impl Into<String>, is_done: bool) -> Self {
        Self {
            title: title.into(),
            is_done,
        }
    }
}
