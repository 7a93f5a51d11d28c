//! Service layer for task creation and soft deletion.

use super::SubtaskGenerator;
use crate::task::{
    domain::{
        DUE_DATE_FORMAT, EventId, NewTask, OwnerId, Priority, Subtask, TaskDomainError, TaskId,
        TaskSnapshot,
    },
    ports::{TaskStore, TaskStoreError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Request payload for creating a task from submitted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    event_id: EventId,
    title: String,
    description: Option<String>,
    priority: Option<i64>,
    due_date: Option<String>,
    category: Option<String>,
    owner_id: Option<String>,
    assignee: Option<String>,
    subtasks: Vec<Subtask>,
    draft_subtasks: bool,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(event_id: EventId, title: impl Into<String>) -> Self {
        Self {
            event_id,
            title: title.into(),
            description: None,
            priority: None,
            due_date: None,
            category: None,
            owner_id: None,
            assignee: None,
            subtasks: Vec::new(),
            draft_subtasks: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the raw priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the raw `YYYY-MM-DD` due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the raw owner UUID.
    #[must_use]
    pub fn with_owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Sets the free-text assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets the initial checklist.
    #[must_use]
    pub fn with_subtasks(mut self, subtasks: impl IntoIterator<Item = Subtask>) -> Self {
        self.subtasks = subtasks.into_iter().collect();
        self
    }

    /// Requests drafted subtasks appended after the initial checklist.
    #[must_use]
    pub const fn with_drafted_subtasks(mut self) -> Self {
        self.draft_subtasks = true;
        self
    }

    fn into_new_task(self) -> Result<(NewTask, bool), TaskDomainError> {
        let mut task = NewTask::new(self.event_id, self.title)?;
        if let Some(description) = non_blank(self.description) {
            task = task.with_description(description);
        }
        if let Some(priority) = self.priority {
            task = task.with_priority(Priority::new(priority)?);
        }
        if let Some(raw) = non_blank(self.due_date) {
            let due_date = NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT)
                .map_err(|_| TaskDomainError::InvalidDueDate(raw.clone()))?;
            task = task.with_due_date(due_date);
        }
        if let Some(category) = non_blank(self.category) {
            task = task.with_category(category);
        }
        if let Some(raw) = non_blank(self.owner_id) {
            let owner = Uuid::parse_str(raw.trim())
                .map_err(|_| TaskDomainError::InvalidOwner(raw.clone()))?;
            task = task.with_owner(OwnerId::from_uuid(owner));
        }
        if let Some(assignee) = non_blank(self.assignee) {
            task = task.with_assignee(assignee);
        }
        let subtasks = self
            .subtasks
            .into_iter()
            .filter(|subtask| !subtask.title.trim().is_empty())
            .collect();
        Ok((task.with_subtasks(subtasks), self.draft_subtasks))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task creation and deletion service.
#[derive(Clone)]
pub struct TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    generator: SubtaskGenerator,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>, generator: SubtaskGenerator) -> Self {
        Self {
            store,
            clock,
            generator,
        }
    }

    /// Validates and stores a new task.
    ///
    /// Drafted subtasks are generated before anything is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when validation fails and
    /// [`TaskLifecycleError::Store`] when the store rejects the task.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<TaskSnapshot> {
        let (mut new_task, draft_subtasks) = request.into_new_task()?;
        if draft_subtasks {
            let drafted = self
                .generator
                .generate(new_task.title(), new_task.description().unwrap_or_default())
                .await;
            let mut subtasks = new_task.subtasks().to_vec();
            subtasks.extend(drafted);
            new_task = new_task.with_subtasks(subtasks);
        }

        let task = TaskSnapshot::create(new_task, &*self.clock);
        self.store.create(&task).await?;
        tracing::info!(task_id = %task.id(), event_id = %task.event_id(), "task created");
        Ok(task)
    }

    /// Soft-deletes one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] (wrapped) when the task does not
    /// exist or is already deleted.
    pub async fn delete(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        let deleted = self.store.soft_delete(&[task_id]).await?;
        if deleted == 0 {
            return Err(TaskStoreError::NotFound(task_id).into());
        }
        Ok(())
    }

    /// Soft-deletes many tasks, returning how many were newly deleted.
    ///
    /// Unknown or already deleted identifiers are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the store fails.
    pub async fn delete_many(&self, task_ids: &[TaskId]) -> TaskLifecycleResult<usize> {
        let deleted = self.store.soft_delete(task_ids).await?;
        tracing::info!(requested = task_ids.len(), deleted, "tasks soft-deleted");
        Ok(deleted)
    }
}
