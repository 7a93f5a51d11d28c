//! Read-side views: scored boards, briefings, reminders, and history.

use crate::task::{
    domain::{
        ChangeEvent, EventId, FollowUp, RiskAssessment, RiskScorer, TaskId, TaskSnapshot,
        follow_ups,
    },
    ports::{TaskStore, TaskStoreResult},
};
use mockable::Clock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A task paired with its risk assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredTask {
    /// The scored task.
    pub task: TaskSnapshot,
    /// Its assessment at scoring time.
    pub assessment: RiskAssessment,
}

/// Scored tasks grouped by category, categories in lexical order.
pub type EventBoard = BTreeMap<String, Vec<ScoredTask>>;

/// Read-only task views computed at the injected clock's current time.
#[derive(Clone)]
pub struct TaskInsightsService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskInsightsService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new insights service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Scores the tasks of one event and groups them by category.
    ///
    /// Each group is ordered by descending score; ties keep creation order.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn event_board(
        &self,
        event_id: EventId,
        include_done: bool,
    ) -> TaskStoreResult<EventBoard> {
        let tasks = self.store.list_by_event(event_id, include_done).await?;
        let mut board = EventBoard::new();
        for scored in self.score_all(tasks) {
            board
                .entry(scored.task.category().to_owned())
                .or_default()
                .push(scored);
        }
        Ok(board)
    }

    /// Scores every active task across all events, highest risk first.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn briefing(&self) -> TaskStoreResult<Vec<ScoredTask>> {
        let tasks = self.store.list_active().await?;
        Ok(self.score_all(tasks))
    }

    /// Lists assignee reminders across all active tasks.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn follow_ups(&self) -> TaskStoreResult<Vec<FollowUp>> {
        let tasks = self.store.list_active().await?;
        Ok(follow_ups(&tasks, self.clock.utc()))
    }

    /// Returns the change history of a task, oldest first.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn history(&self, task_id: TaskId) -> TaskStoreResult<Vec<ChangeEvent>> {
        self.store.list_change_events(task_id).await
    }

    fn score_all(&self, tasks: Vec<TaskSnapshot>) -> Vec<ScoredTask> {
        let now = self.clock.utc();
        let mut scored: Vec<ScoredTask> = tasks
            .into_iter()
            .map(|task| {
                let assessment = RiskScorer::assess(&task, now);
                ScoredTask { task, assessment }
            })
            .collect();
        scored.sort_by(|left, right| right.assessment.score.cmp(&left.assessment.score));
        scored
    }
}
