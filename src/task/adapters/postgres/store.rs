//! `PostgreSQL` task store.
//!
//! Units of work run on one pooled connection inside an explicit
//! transaction so that a failed rollback can be reported alongside the
//! error that triggered it.

use super::{
    models::{NewTaskEventRow, NewTaskRow, TaskChangeset, TaskEventRow, TaskRow},
    schema::{task_events, tasks},
};
use crate::config::DatabaseConfig;
use crate::task::{
    domain::{
        ChangeEvent, ChangeEventId, ChangeEventType, EventId, FieldChange, OwnerId,
        PersistedTaskData, Priority, Subtask, TaskId, TaskSnapshot, TaskStatus,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult, TaskTransaction},
};
use async_trait::async_trait;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the task store.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a store from an existing connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool from configuration.
    ///
    /// This blocks while the pool opens its initial connections.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the pool cannot be built.
    pub fn connect(config: &DatabaseConfig) -> TaskStoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)
            .map_err(TaskStoreError::persistence)?;
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn create(&self, task: &TaskSnapshot) -> TaskStoreResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskStoreError::DuplicateTask(task_id)
                    }
                    _ => TaskStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<TaskSnapshot>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_event(
        &self,
        event_id: EventId,
        include_done: bool,
    ) -> TaskStoreResult<Vec<TaskSnapshot>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::event_id.eq(event_id.into_inner()))
                .filter(tasks::deleted.eq(false))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows_to_listed_tasks(rows, include_done)
        })
        .await
    }

    async fn list_active(&self) -> TaskStoreResult<Vec<TaskSnapshot>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::deleted.eq(false))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows_to_listed_tasks(rows, false)
        })
        .await
    }

    async fn soft_delete(&self, ids: &[TaskId]) -> TaskStoreResult<usize> {
        let raw_ids: Vec<uuid::Uuid> = ids.iter().copied().map(TaskId::into_inner).collect();
        self.run_blocking(move |connection| {
            diesel::update(
                tasks::table
                    .filter(tasks::id.eq_any(raw_ids))
                    .filter(tasks::deleted.eq(false)),
            )
            .set(tasks::deleted.eq(true))
            .execute(connection)
            .map_err(TaskStoreError::persistence)
        })
        .await
    }

    async fn list_change_events(&self, task_id: TaskId) -> TaskStoreResult<Vec<ChangeEvent>> {
        self.run_blocking(move |connection| {
            let rows = task_events::table
                .filter(task_events::task_id.eq(task_id.into_inner()))
                .order(task_events::created_at.asc())
                .select(TaskEventRow::as_select())
                .load::<TaskEventRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }

    async fn run_in_transaction<T, F>(&self, work: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut dyn TaskTransaction) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run_blocking(move |connection| run_unit_of_work(connection, work))
            .await
    }
}

fn run_unit_of_work<T, F>(connection: &mut PgConnection, work: F) -> TaskStoreResult<T>
where
    F: FnOnce(&mut dyn TaskTransaction) -> TaskStoreResult<T>,
{
    AnsiTransactionManager::begin_transaction(connection).map_err(TaskStoreError::persistence)?;

    let outcome = {
        let mut transaction = PgTaskTransaction {
            connection: &mut *connection,
        };
        work(&mut transaction)
    };

    match outcome {
        Ok(value) => match AnsiTransactionManager::commit_transaction(connection) {
            Ok(()) => Ok(value),
            Err(DieselError::RollbackErrorOnCommit {
                rollback_error,
                commit_error,
            }) => Err(TaskStoreError::rollback_failed(
                TaskStoreError::persistence(*commit_error),
                TaskStoreError::persistence(*rollback_error),
            )),
            Err(commit_error) => Err(TaskStoreError::persistence(commit_error)),
        },
        Err(original) => match AnsiTransactionManager::rollback_transaction(connection) {
            Ok(()) => Err(original),
            Err(rollback_error) => Err(TaskStoreError::rollback_failed(
                original,
                TaskStoreError::persistence(rollback_error),
            )),
        },
    }
}

/// Transactional view over one pooled connection.
struct PgTaskTransaction<'a> {
    connection: &'a mut PgConnection,
}

impl TaskTransaction for PgTaskTransaction<'_> {
    fn find_task(&mut self, id: TaskId) -> TaskStoreResult<Option<TaskSnapshot>> {
        let row = tasks::table
            .filter(tasks::id.eq(id.into_inner()))
            .select(TaskRow::as_select())
            .for_update()
            .first::<TaskRow>(&mut *self.connection)
            .optional()
            .map_err(TaskStoreError::persistence)?;
        row.map(row_to_task).transpose()
    }

    fn update_task(&mut self, task: &TaskSnapshot) -> TaskStoreResult<()> {
        let changeset = to_changeset(task)?;
        let updated = diesel::update(tasks::table.filter(tasks::id.eq(task.id().into_inner())))
            .set(&changeset)
            .execute(&mut *self.connection)
            .map_err(TaskStoreError::persistence)?;
        if updated == 0 {
            return Err(TaskStoreError::NotFound(task.id()));
        }
        Ok(())
    }

    fn insert_change_event(&mut self, event: &ChangeEvent) -> TaskStoreResult<()> {
        let row = to_new_event_row(event)?;
        diesel::insert_into(task_events::table)
            .values(&row)
            .execute(&mut *self.connection)
            .map_err(TaskStoreError::persistence)?;
        Ok(())
    }
}

fn subtasks_to_value(subtasks: &[Subtask]) -> TaskStoreResult<serde_json::Value> {
    serde_json::to_value(subtasks).map_err(TaskStoreError::persistence)
}

fn priority_to_column(priority: Priority) -> i32 {
    i32::from(priority.value())
}

fn to_new_row(task: &TaskSnapshot) -> TaskStoreResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        event_id: task.event_id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(ToOwned::to_owned),
        status: task.status().as_str().to_owned(),
        priority: priority_to_column(task.priority()),
        due_date: task.due_date(),
        category: task.category().to_owned(),
        owner_id: task.owner().map(OwnerId::into_inner),
        assignee_text: task.assignee().map(ToOwned::to_owned),
        subtasks: Some(subtasks_to_value(task.subtasks())?),
        tags: task.tags().iter().cloned().collect(),
        created_at: task.created_at(),
        last_update_at: task.last_update_at(),
        deleted: task.is_deleted(),
    })
}

fn to_changeset(task: &TaskSnapshot) -> TaskStoreResult<TaskChangeset> {
    Ok(TaskChangeset {
        title: task.title().to_owned(),
        description: task.description().map(ToOwned::to_owned),
        status: task.status().as_str().to_owned(),
        priority: priority_to_column(task.priority()),
        due_date: task.due_date(),
        category: task.category().to_owned(),
        owner_id: task.owner().map(OwnerId::into_inner),
        assignee_text: task.assignee().map(ToOwned::to_owned),
        subtasks: Some(subtasks_to_value(task.subtasks())?),
        tags: task.tags().iter().cloned().collect(),
        last_update_at: task.last_update_at(),
    })
}

fn to_new_event_row(event: &ChangeEvent) -> TaskStoreResult<NewTaskEventRow> {
    let changes = serde_json::to_value(event.changes()).map_err(TaskStoreError::persistence)?;
    Ok(NewTaskEventRow {
        id: event.id().into_inner(),
        task_id: event.task_id().into_inner(),
        event_type: event.event_type().as_str().to_owned(),
        changes,
        created_at: event.created_at(),
    })
}

fn rows_to_listed_tasks(
    rows: Vec<TaskRow>,
    include_done: bool,
) -> TaskStoreResult<Vec<TaskSnapshot>> {
    let tasks = rows
        .into_iter()
        .map(row_to_task)
        .collect::<TaskStoreResult<Vec<_>>>()?;
    Ok(tasks
        .into_iter()
        .filter(|task| include_done || !task.status().is_done())
        .collect())
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<TaskSnapshot> {
    let TaskRow {
        id,
        event_id,
        title,
        description,
        status,
        priority,
        due_date,
        category,
        owner_id,
        assignee_text,
        subtasks: persisted_subtasks,
        tags,
        created_at,
        last_update_at,
        deleted,
    } = row;

    // A NULL column and JSON null both mean an empty checklist.
    let subtasks = match persisted_subtasks {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value::<Vec<Subtask>>(value)
            .map_err(TaskStoreError::persistence)?,
    };

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        event_id: EventId::from_uuid(event_id),
        title,
        description,
        status: TaskStatus::from(status.as_str()),
        priority: Priority::clamped(i64::from(priority)),
        due_date,
        category,
        owner: owner_id.map(OwnerId::from_uuid),
        assignee: assignee_text,
        subtasks,
        tags: tags.into_iter().collect(),
        created_at,
        last_update_at,
        deleted,
    };
    Ok(TaskSnapshot::from_persisted(data))
}

fn row_to_event(row: TaskEventRow) -> TaskStoreResult<ChangeEvent> {
    let event_type = ChangeEventType::try_from(row.event_type.as_str())
        .map_err(TaskStoreError::persistence)?;
    let changes = serde_json::from_value::<Vec<FieldChange>>(row.changes)
        .map_err(TaskStoreError::persistence)?;
    Ok(ChangeEvent::from_persisted(
        ChangeEventId::from_uuid(row.id),
        TaskId::from_uuid(row.task_id),
        event_type,
        changes,
        row.created_at,
    ))
}
