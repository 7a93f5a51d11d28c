//! Unit tests for the task planning core.


use crate::task::domain::{
    EventId, NewTask, PersistedTaskData, Priority, Subtask, TaskId, TaskSnapshot, TaskStatus,
};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use std::collections::BTreeSet;

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Noon on 2026-03-10, the reference instant for scoring tests.
pub(super) fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
        .single()
        .expect("valid reference instant")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Builds persisted snapshots with explicit field values.
#[derive(Debug, Clone)]
pub(super) struct SnapshotBuilder {
    data: PersistedTaskData,
}

impl SnapshotBuilder {
    pub(super) fn new(title: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            data: PersistedTaskData {
                id: TaskId::new(),
                event_id: EventId::new(),
                title: title.to_owned(),
                description: None,
                status: TaskStatus::Todo,
                priority: Priority::default(),
                due_date: None,
                category: "general".to_owned(),
                owner: None,
                assignee: None,
                subtasks: Vec::new(),
                tags: BTreeSet::new(),
                created_at,
                last_update_at: None,
                deleted: false,
            },
        }
    }

    pub(super) fn event(mut self, event_id: EventId) -> Self {
        self.data.event_id = event_id;
        self
    }

    pub(super) fn description(mut self, description: &str) -> Self {
        self.data.description = Some(description.to_owned());
        self
    }

    pub(super) fn status(mut self, status: TaskStatus) -> Self {
        self.data.status = status;
        self
    }

    pub(super) fn priority(mut self, value: i64) -> Self {
        self.data.priority = Priority::new(value).expect("valid priority");
        self
    }

    pub(super) fn due(mut self, due_date: NaiveDate) -> Self {
        self.data.due_date = Some(due_date);
        self
    }

    pub(super) fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.data.category);
        self
    }

    pub(super) fn assignee(mut self, assignee: &str) -> Self {
        self.data.assignee = Some(assignee.to_owned());
        self
    }

    pub(super) fn subtasks(mut self, subtasks: &[Subtask]) -> Self {
        self.data.subtasks = subtasks.to_vec();
        self
    }

    pub(super) fn tags(mut self, tags: &[&str]) -> Self {
        self.data.tags = tags.iter().map(|tag| (*tag).to_owned()).collect();
        self
    }

    pub(super) fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.data.last_update_at = Some(at);
        self
    }

    pub(super) fn deleted(mut self) -> Self {
        self.data.deleted = true;
        self
    }

    pub(super) fn build(self) -> TaskSnapshot {
        TaskSnapshot::from_persisted(self.data)
    }
}

/// Creates a fresh task through the domain constructor.
pub(super) fn created_task(title: &str, now: DateTime<Utc>) -> TaskSnapshot {
    let request = NewTask::new(EventId::new(), title).expect("valid task");
    TaskSnapshot::create(request, &FixedClock(now))
}

pub(super) fn days(count: i64) -> Duration {
    Duration::days(count)
}
