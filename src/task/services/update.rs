//! Transactional task updates with audit events.

use super::SubtaskGenerator;
use crate::task::{
    domain::{
        ChangeDiffer, ChangeEvent, DiffPolicy, Subtask, TaskId, TaskSnapshot, TaskUpdate,
        TaskUpdateForm,
    },
    ports::{TaskStore, TaskStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task updates.
#[derive(Debug, Error)]
pub enum TaskUpdateError {
    /// The task does not exist or is soft-deleted.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A store operation failed and the unit of work was rolled back.
    #[error(transparent)]
    Persistence(TaskStoreError),

    /// The unit of work failed and its rollback failed too.
    #[error("rollback failed ({rollback}) after: {original}")]
    RollbackFailure {
        /// Error that aborted the unit of work.
        original: TaskStoreError,
        /// Error raised by the rollback.
        rollback: TaskStoreError,
    },
}

impl From<TaskStoreError> for TaskUpdateError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::NotFound(id) => Self::NotFound(id),
            TaskStoreError::RollbackFailed { original, rollback } => Self::RollbackFailure {
                original: *original,
                rollback: *rollback,
            },
            other => Self::Persistence(other),
        }
    }
}

/// Result type for task update operations.
pub type TaskUpdateResult<T> = Result<T, TaskUpdateError>;

/// Applies partial updates to tasks as single atomic units of work.
///
/// Each committed update persists the merged task and, when a watched field
/// changed, exactly one `UPDATED` change event. Nothing survives a failed
/// update.
#[derive(Clone)]
pub struct TaskUpdateCoordinator<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    generator: SubtaskGenerator,
    differ: ChangeDiffer,
}

impl<S, C> TaskUpdateCoordinator<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator using the core diff policy.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, generator: SubtaskGenerator) -> Self {
        Self {
            store,
            clock,
            generator,
            differ: ChangeDiffer::default(),
        }
    }

    /// Replaces the diff policy.
    #[must_use]
    pub const fn with_diff_policy(mut self, policy: DiffPolicy) -> Self {
        self.differ = ChangeDiffer::new(policy);
        self
    }

    /// Applies a submitted edit form.
    ///
    /// Blank form values leave the stored field unchanged. When `trigger_ai`
    /// is set, drafted subtasks are appended after the submitted rows, or
    /// after the stored checklist when no rows were submitted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskUpdateError::NotFound`] for missing or soft-deleted
    /// tasks, [`TaskUpdateError::Persistence`] when the store fails, and
    /// [`TaskUpdateError::RollbackFailure`] when the rollback also fails.
    pub async fn update(
        &self,
        task_id: TaskId,
        form: TaskUpdateForm,
        trigger_ai: bool,
    ) -> TaskUpdateResult<TaskSnapshot> {
        self.apply(task_id, form.into_update(), trigger_ai).await
    }

    /// Applies a typed partial update.
    ///
    /// # Errors
    ///
    /// See [`Self::update`].
    pub async fn apply(
        &self,
        task_id: TaskId,
        update: TaskUpdate,
        trigger_ai: bool,
    ) -> TaskUpdateResult<TaskSnapshot> {
        let drafted = if trigger_ai {
            Some(self.draft_subtasks(task_id, &update).await?)
        } else {
            None
        };

        let now = self.clock.utc();
        let differ = self.differ;
        let outcome = self
            .store
            .run_in_transaction(move |transaction| {
                let old = transaction
                    .find_task(task_id)?
                    .filter(|task| !task.is_deleted())
                    .ok_or(TaskStoreError::NotFound(task_id))?;
                let prepared = match drafted {
                    Some(items) => with_appended(update, &old, items),
                    None => update,
                };
                let new = old.merged(&prepared, now);
                transaction.update_task(&new)?;

                let changes = differ.diff(&old, &new);
                let recorded = changes.len();
                if !changes.is_empty() {
                    let event = ChangeEvent::updated(task_id, changes, now);
                    transaction.insert_change_event(&event)?;
                }
                Ok((new, recorded))
            })
            .await;

        match outcome {
            Ok((task, recorded)) => {
                tracing::info!(task_id = %task_id, changes = recorded, "task update committed");
                Ok(task)
            }
            Err(err) => {
                if let TaskStoreError::RollbackFailed { original, rollback } = &err {
                    tracing::error!(
                        task_id = %task_id,
                        original = %original,
                        rollback = %rollback,
                        "task update rollback failed"
                    );
                }
                Err(err.into())
            }
        }
    }

    async fn draft_subtasks(
        &self,
        task_id: TaskId,
        update: &TaskUpdate,
    ) -> TaskUpdateResult<Vec<Subtask>> {
        let (title, description) = match (update.title(), update.description()) {
            (Some(title), Some(description)) => (title.to_owned(), description.to_owned()),
            (title, description) => {
                let current = self.find_live(task_id).await?;
                (
                    title.unwrap_or(current.title()).to_owned(),
                    description
                        .or(current.description())
                        .unwrap_or_default()
                        .to_owned(),
                )
            }
        };
        Ok(self.generator.generate(&title, &description).await)
    }

    async fn find_live(&self, task_id: TaskId) -> TaskUpdateResult<TaskSnapshot> {
        self.store
            .find_by_id(task_id)
            .await?
            .filter(|task| !task.is_deleted())
            .ok_or(TaskUpdateError::NotFound(task_id))
    }
}

/// Appends drafted items after the submitted checklist, or after the stored
/// one when the update carries no checklist.
fn with_appended(
    update: TaskUpdate,
    current: &TaskSnapshot,
    drafted: Vec<Subtask>,
) -> TaskUpdate {
    let mut subtasks = update
        .subtasks()
        .unwrap_or_else(|| current.subtasks())
        .to_vec();
    subtasks.extend(drafted);
    update.with_subtasks(subtasks)
}
