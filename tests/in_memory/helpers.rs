//! Shared fixtures for in-memory store integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use planwright::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{EventId, NewTask, TaskSnapshot},
};
use rstest::fixture;

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl mockable::Clock for FixedClock {
    fn local(&self) -> DateTime<chrono::Local> {
        self.0.with_timezone(&chrono::Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Provides a fresh store for each test.
#[fixture]
pub fn store() -> InMemoryTaskStore {
    InMemoryTaskStore::new()
}

/// Provides an event identifier shared by one test.
#[fixture]
pub fn event_id() -> EventId {
    EventId::new()
}

/// Returns the instant `minutes` after a fixed base time.
pub fn at_minute(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0)
        .single()
        .expect("valid base instant")
        + Duration::minutes(minutes)
}

/// Creates a task for `event_id` stamped `minutes` after the base time.
pub fn task_at(event_id: EventId, title: &str, minutes: i64) -> TaskSnapshot {
    let request = NewTask::new(event_id, title).expect("valid task request");
    TaskSnapshot::create(request, &FixedClock(at_minute(minutes)))
}
