//! Store port for task persistence, audit events, and transactional units of
//! work.

use crate::task::domain::{ChangeEvent, EventId, TaskId, TaskSnapshot};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Operations available inside a unit of work.
///
/// Every call observes and affects only the enclosing transaction until it
/// commits.
pub trait TaskTransaction {
    /// Reads a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the read fails.
    fn find_task(&mut self, id: TaskId) -> TaskStoreResult<Option<TaskSnapshot>>;

    /// Overwrites the stored row of `task` with its current field values.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when no row exists for the task.
    fn update_task(&mut self, task: &TaskSnapshot) -> TaskStoreResult<()>;

    /// Appends a change event.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the insert fails.
    fn insert_change_event(&mut self, event: &ChangeEvent) -> TaskStoreResult<()>;
}

/// Task persistence contract.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the identifier exists.
    async fn create(&self, task: &TaskSnapshot) -> TaskStoreResult<()>;

    /// Finds a task by identifier, including soft-deleted tasks.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<TaskSnapshot>>;

    /// Lists non-deleted tasks of a planning event.
    ///
    /// Tasks in the `done` state are included only when `include_done` is set.
    async fn list_by_event(
        &self,
        event_id: EventId,
        include_done: bool,
    ) -> TaskStoreResult<Vec<TaskSnapshot>>;

    /// Lists every non-deleted task that is not done.
    async fn list_active(&self) -> TaskStoreResult<Vec<TaskSnapshot>>;

    /// Soft-deletes the given tasks; unknown identifiers are ignored.
    ///
    /// Returns the number of tasks newly marked as deleted.
    async fn soft_delete(&self, ids: &[TaskId]) -> TaskStoreResult<usize>;

    /// Lists change events of a task, oldest first.
    async fn list_change_events(&self, task_id: TaskId) -> TaskStoreResult<Vec<ChangeEvent>>;

    /// Runs `work` inside one transaction.
    ///
    /// Commits when `work` succeeds and rolls back when it fails. A failed
    /// rollback is reported as [`TaskStoreError::RollbackFailed`] carrying
    /// both errors.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a persistence error from
    /// beginning or committing the transaction.
    async fn run_in_transaction<T, F>(&self, work: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut dyn TaskTransaction) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),

    /// Rolling back after a failure failed as well.
    #[error("rollback failed ({rollback}) after error: {original}")]
    RollbackFailed {
        /// The failure that triggered the rollback.
        original: Box<TaskStoreError>,
        /// The failure of the rollback itself.
        rollback: Box<TaskStoreError>,
    },
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Combines a failure with the error raised while rolling it back.
    #[must_use]
    pub fn rollback_failed(original: Self, rollback: Self) -> Self {
        Self::RollbackFailed {
            original: Box::new(original),
            rollback: Box::new(rollback),
        }
    }
}
