//! In-memory task store for planning tests.
//!
//! Transactions operate on a private copy of the state that replaces the
//! shared state only on commit, so a failed unit of work leaves no trace.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{ChangeEvent, EventId, TaskId, TaskSnapshot},
    ports::{TaskStore, TaskStoreError, TaskStoreResult, TaskTransaction},
};

/// Failures the in-memory store injects on request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreFaults {
    /// Fail every change event insert.
    pub fail_event_insert: bool,
    /// Fail every task row update.
    pub fail_task_update: bool,
    /// Fail commits.
    pub fail_commit: bool,
    /// Fail rollbacks.
    pub fail_rollback: bool,
}

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
    faults: Arc<RwLock<StoreFaults>>,
}

#[derive(Debug, Clone, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, TaskSnapshot>,
    events: Vec<ChangeEvent>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the injected failure plan.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the fault lock is
    /// poisoned.
    pub fn set_faults(&self, faults: StoreFaults) -> TaskStoreResult<()> {
        let mut guard = self.faults.write().map_err(poisoned)?;
        *guard = faults;
        Ok(())
    }

    /// Returns every stored change event, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the state lock is
    /// poisoned.
    pub fn all_change_events(&self) -> TaskStoreResult<Vec<ChangeEvent>> {
        Ok(self.read_state()?.events.clone())
    }

    fn read_state(&self) -> TaskStoreResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(poisoned)
    }

    fn write_state(&self) -> TaskStoreResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(poisoned)
    }

    fn faults(&self) -> TaskStoreResult<StoreFaults> {
        Ok(*self.faults.read().map_err(poisoned)?)
    }
}

fn poisoned<E: std::fmt::Display>(err: E) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

fn injected(operation: &str) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(format!("injected {operation} failure")))
}

/// Unit-of-work view over a working copy of the store state.
struct InMemoryTransaction<'a> {
    working: &'a mut InMemoryTaskState,
    faults: StoreFaults,
}

impl TaskTransaction for InMemoryTransaction<'_> {
    fn find_task(&mut self, id: TaskId) -> TaskStoreResult<Option<TaskSnapshot>> {
        Ok(self.working.tasks.get(&id).cloned())
    }

    fn update_task(&mut self, task: &TaskSnapshot) -> TaskStoreResult<()> {
        if self.faults.fail_task_update {
            return Err(injected("task update"));
        }
        let slot = self
            .working
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskStoreError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    fn insert_change_event(&mut self, event: &ChangeEvent) -> TaskStoreResult<()> {
        if self.faults.fail_event_insert {
            return Err(injected("change event insert"));
        }
        self.working.events.push(event.clone());
        Ok(())
    }
}

fn is_listed(task: &TaskSnapshot, include_done: bool) -> bool {
    !task.is_deleted() && (include_done || !task.status().is_done())
}

fn sorted_by_creation(mut tasks: Vec<TaskSnapshot>) -> Vec<TaskSnapshot> {
    tasks.sort_by_key(TaskSnapshot::created_at);
    tasks
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: &TaskSnapshot) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<TaskSnapshot>> {
        Ok(self.read_state()?.tasks.get(&id).cloned())
    }

    async fn list_by_event(
        &self,
        event_id: EventId,
        include_done: bool,
    ) -> TaskStoreResult<Vec<TaskSnapshot>> {
        let state = self.read_state()?;
        let tasks = state
            .tasks
            .values()
            .filter(|task| task.event_id() == event_id && is_listed(task, include_done))
            .cloned()
            .collect();
        Ok(sorted_by_creation(tasks))
    }

    async fn list_active(&self) -> TaskStoreResult<Vec<TaskSnapshot>> {
        let state = self.read_state()?;
        let tasks = state
            .tasks
            .values()
            .filter(|task| is_listed(task, false))
            .cloned()
            .collect();
        Ok(sorted_by_creation(tasks))
    }

    async fn soft_delete(&self, ids: &[TaskId]) -> TaskStoreResult<usize> {
        let mut state = self.write_state()?;
        let mut deleted = 0;
        for id in ids {
            if let Some(task) = state.tasks.get_mut(id)
                && !task.is_deleted()
            {
                task.mark_deleted();
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn list_change_events(&self, task_id: TaskId) -> TaskStoreResult<Vec<ChangeEvent>> {
        let state = self.read_state()?;
        Ok(state
            .events
            .iter()
            .filter(|event| event.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn run_in_transaction<T, F>(&self, work: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut dyn TaskTransaction) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let faults = self.faults()?;
        // The write lock is held for the whole unit of work.
        let mut state = self.write_state()?;
        let mut working = state.clone();

        let outcome = work(&mut InMemoryTransaction {
            working: &mut working,
            faults,
        });

        match outcome {
            Ok(_) if faults.fail_commit => {
                let commit_error = injected("commit");
                if faults.fail_rollback {
                    return Err(TaskStoreError::rollback_failed(
                        commit_error,
                        injected("rollback"),
                    ));
                }
                Err(commit_error)
            }
            Ok(value) => {
                *state = working;
                Ok(value)
            }
            Err(original) if faults.fail_rollback => Err(TaskStoreError::rollback_failed(
                original,
                injected("rollback"),
            )),
            Err(original) => Err(original),
        }
    }
}
