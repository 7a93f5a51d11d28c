//! Field-level diffing of task snapshots.

use super::{FieldChange, TaskSnapshot, WatchedField};
use serde_json::{Value, json};

/// Selects which fields the differ compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffPolicy {
    watch_due_date: bool,
    watch_tags: bool,
}

impl DiffPolicy {
    /// Watches title, description, status, and priority.
    #[must_use]
    pub const fn core() -> Self {
        Self {
            watch_due_date: false,
            watch_tags: false,
        }
    }

    /// Watches the core fields plus due date and tags.
    #[must_use]
    pub const fn extended() -> Self {
        Self {
            watch_due_date: true,
            watch_tags: true,
        }
    }

    /// Returns `true` when `field` is compared under this policy.
    #[must_use]
    pub const fn watches(self, field: WatchedField) -> bool {
        match field {
            WatchedField::Title
            | WatchedField::Description
            | WatchedField::Status
            | WatchedField::Priority => true,
            WatchedField::DueDate => self.watch_due_date,
            WatchedField::Tags => self.watch_tags,
        }
    }
}

impl Default for DiffPolicy {
    fn default() -> Self {
        Self::core()
    }
}

/// Computes ordered field-level changes between two snapshots of one task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeDiffer {
    policy: DiffPolicy,
}

impl ChangeDiffer {
    /// Creates a differ with the given policy.
    #[must_use]
    pub const fn new(policy: DiffPolicy) -> Self {
        Self { policy }
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(self) -> DiffPolicy {
        self.policy
    }

    /// Lists the watched fields whose value or presence differs.
    ///
    /// Changes are emitted in [`WatchedField`] declaration order. Identical
    /// snapshots yield an empty list.
    #[must_use]
    pub fn diff(self, old: &TaskSnapshot, new: &TaskSnapshot) -> Vec<FieldChange> {
        WatchedField::ALL
            .into_iter()
            .filter(|field| self.policy.watches(*field))
            .filter_map(|field| {
                let from = field_value(old, field);
                let to = field_value(new, field);
                (from != to).then(|| FieldChange::new(field, from, to))
            })
            .collect()
    }
}

/// Diffs two snapshots under the core policy.
#[must_use]
pub fn diff(old: &TaskSnapshot, new: &TaskSnapshot) -> Vec<FieldChange> {
    ChangeDiffer::default().diff(old, new)
}

// `Option` maps to `null` versus a concrete value, so a presence change is
// always visible even when the rendered text would match.
fn field_value(task: &TaskSnapshot, field: WatchedField) -> Value {
    match field {
        WatchedField::Title => json!(task.title()),
        WatchedField::Description => json!(task.description()),
        WatchedField::Status => json!(task.status().as_str()),
        WatchedField::Priority => json!(task.priority().value()),
        WatchedField::DueDate => json!(task.due_date()),
        WatchedField::Tags => json!(task.tags()),
    }
}
