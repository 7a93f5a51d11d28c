//! Shared world state for task update BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use planwright::task::{
    adapters::memory::InMemoryTaskStore,
    domain::TaskSnapshot,
    services::{
        SubtaskGenerator, TaskLifecycleService, TaskUpdateCoordinator, TaskUpdateError,
    },
};
use rstest::fixture;

/// Scenario world for task update behaviour tests.
pub struct TaskUpdateWorld {
    pub store: Arc<InMemoryTaskStore>,
    pub lifecycle: TaskLifecycleService<InMemoryTaskStore, DefaultClock>,
    pub coordinator: TaskUpdateCoordinator<InMemoryTaskStore, DefaultClock>,
    pub task: Option<TaskSnapshot>,
    pub last_update: Option<Result<TaskSnapshot, TaskUpdateError>>,
}

impl TaskUpdateWorld {
    /// Creates a world backed by an empty store and an offline generator.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            lifecycle: TaskLifecycleService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                SubtaskGenerator::offline(),
            ),
            coordinator: TaskUpdateCoordinator::new(
                Arc::clone(&store),
                clock,
                SubtaskGenerator::offline(),
            ),
            store,
            task: None,
            last_update: None,
        }
    }

    /// Returns the task created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> Result<&TaskSnapshot, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the result of the last update attempt.
    ///
    /// # Errors
    ///
    /// Returns an error when no update has been attempted.
    pub fn last_update(&self) -> Result<&Result<TaskSnapshot, TaskUpdateError>, eyre::Report> {
        self.last_update
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing update result in scenario world"))
    }
}

impl Default for TaskUpdateWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskUpdateWorld {
    TaskUpdateWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
