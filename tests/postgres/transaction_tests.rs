//! Transactional behaviour of the `PostgreSQL` store.

use super::helpers::{FixedClock, at_minute, prepared_store, task_at};
use planwright::task::{
    domain::{ChangeEvent, EventId, TaskId, TaskStatus, TaskUpdate, WatchedField, diff},
    ports::{TaskStore, TaskStoreError},
    services::{SubtaskGenerator, TaskUpdateCoordinator},
};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn coordinator_commits_task_and_event() -> eyre::Result<()> {
    let Some(prepared) = prepared_store()? else {
        return Ok(());
    };
    let task = task_at(EventId::new(), "Book venue", 0);
    prepared.store.create(&task).await?;
    let coordinator = TaskUpdateCoordinator::new(
        Arc::new(prepared.store.clone()),
        Arc::new(FixedClock(at_minute(10))),
        SubtaskGenerator::offline(),
    );

    let updated = coordinator
        .apply(
            task.id(),
            TaskUpdate::new().with_status(TaskStatus::Blocked),
            false,
        )
        .await?;

    let stored = prepared.store.find_by_id(task.id()).await?;
    let history = prepared.store.list_change_events(task.id()).await?;
    eyre::ensure!(stored.as_ref() == Some(&updated), "stored task differs");
    let fields: Vec<WatchedField> = history
        .iter()
        .flat_map(ChangeEvent::changes)
        .map(|change| change.field)
        .collect();
    eyre::ensure!(fields == [WatchedField::Status], "unexpected history: {fields:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_work_is_rolled_back() -> eyre::Result<()> {
    let Some(prepared) = prepared_store()? else {
        return Ok(());
    };
    let task = task_at(EventId::new(), "Book venue", 0);
    prepared.store.create(&task).await?;
    let renamed = task.merged(&TaskUpdate::new().with_title("Book hall"), at_minute(5));
    let event = ChangeEvent::updated(TaskId::new(), diff(&task, &renamed), at_minute(5));

    let result = prepared
        .store
        .run_in_transaction(move |transaction| {
            transaction.update_task(&renamed)?;
            // References an unknown task, so the foreign key rejects it.
            transaction.insert_change_event(&event)
        })
        .await;

    eyre::ensure!(
        matches!(result, Err(TaskStoreError::Persistence(_))),
        "expected persistence error, got {result:?}"
    );
    let stored = prepared.store.find_by_id(task.id()).await?;
    eyre::ensure!(stored.as_ref() == Some(&task), "update was not rolled back");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_missing_row_reports_not_found() -> eyre::Result<()> {
    let Some(prepared) = prepared_store()? else {
        return Ok(());
    };
    let ghost = task_at(EventId::new(), "Never stored", 0);
    let ghost_id = ghost.id();

    let result = prepared
        .store
        .run_in_transaction(move |transaction| transaction.update_task(&ghost))
        .await;

    eyre::ensure!(
        matches!(result, Err(TaskStoreError::NotFound(id)) if id == ghost_id),
        "expected not found, got {result:?}"
    );
    Ok(())
}
