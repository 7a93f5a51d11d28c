//! Shared helpers for `PostgreSQL` integration tests.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use eyre::WrapErr;
use planwright::task::{
    adapters::postgres::PostgresTaskStore,
    domain::{EventId, NewTask, TaskSnapshot},
};
use uuid::Uuid;

/// Variable naming the server used by these tests.
pub const TEST_DATABASE_ENV: &str = "PLANWRIGHT_TEST_DATABASE_URL";

/// SQL creating the task tables.
pub const CREATE_TASKS_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_tasks/up.sql");

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl mockable::Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Returns a whole-second instant `minutes` after a fixed base time.
///
/// Whole seconds survive the microsecond precision of `TIMESTAMPTZ`.
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

#[derive(Debug)]
struct SearchPath(String);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for SearchPath {
    fn on_acquire(&self, connection: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .batch_execute(&format!("SET search_path TO {}", self.0))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// A migrated schema and a store bound to it; the schema is dropped on drop.
pub struct PreparedStore {
    /// Store whose connections resolve tables in the test schema.
    pub store: PostgresTaskStore,
    url: String,
    schema: String,
}

impl PreparedStore {
    /// Opens a raw connection scoped to the test schema.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection cannot be established.
    pub fn connection(&self) -> eyre::Result<PgConnection> {
        let mut connection =
            PgConnection::establish(&self.url).wrap_err("connect to test database")?;
        connection
            .batch_execute(&format!("SET search_path TO {}", self.schema))
            .wrap_err("select test schema")?;
        Ok(connection)
    }
}

impl Drop for PreparedStore {
    fn drop(&mut self) {
        let dropped = PgConnection::establish(&self.url)
            .map_err(|err| err.to_string())
            .and_then(|mut connection| {
                connection
                    .batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema))
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = dropped {
            tracing::warn!(schema = %self.schema, error = %err, "failed to drop test schema");
        }
    }
}

/// Creates a migrated schema and a store bound to it.
///
/// Returns `None` when no test database is configured.
///
/// # Errors
///
/// Returns an error when the schema cannot be created or migrated.
pub fn prepared_store() -> eyre::Result<Option<PreparedStore>> {
    let Ok(url) = std::env::var(TEST_DATABASE_ENV) else {
        return Ok(None);
    };
    let schema = format!("planwright_test_{}", Uuid::new_v4().simple());

    let mut connection = PgConnection::establish(&url).wrap_err("connect to test database")?;
    connection
        .batch_execute(&format!("CREATE SCHEMA {schema}; SET search_path TO {schema};"))
        .wrap_err("create test schema")?;
    connection
        .batch_execute(CREATE_TASKS_SQL)
        .wrap_err("apply task migration")?;

    let pool = Pool::builder()
        .max_size(2)
        .connection_customizer(Box::new(SearchPath(schema.clone())))
        .build(ConnectionManager::<PgConnection>::new(url.as_str()))
        .wrap_err("build test pool")?;

    Ok(Some(PreparedStore {
        store: PostgresTaskStore::new(pool),
        url,
        schema,
    }))
}
