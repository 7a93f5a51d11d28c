//! Store-level behaviour outside transactions.

use super::helpers::{event_id, store, task_at};
use planwright::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{EventId, TaskId, TaskStatus, TaskUpdate},
    ports::{TaskStore, TaskStoreError},
};
use rstest::rstest;

fn titles(tasks: &[planwright::task::domain::TaskSnapshot]) -> Vec<&str> {
    tasks.iter().map(|task| task.title()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_then_find_returns_equal_snapshot(store: InMemoryTaskStore, event_id: EventId) {
    let task = task_at(event_id, "Book venue", 0);
    store.create(&task).await.expect("create should succeed");

    let found = store.find_by_id(task.id()).await.expect("lookup should succeed");

    assert_eq!(found, Some(task));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_create_is_rejected(store: InMemoryTaskStore, event_id: EventId) {
    let task = task_at(event_id, "Book venue", 0);
    store.create(&task).await.expect("first create should succeed");

    let err = store
        .create(&task)
        .await
        .expect_err("second create should fail");

    assert!(matches!(err, TaskStoreError::DuplicateTask(id) if id == task.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_unknown_task_returns_none(store: InMemoryTaskStore) {
    let found = store
        .find_by_id(TaskId::new())
        .await
        .expect("lookup should succeed");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_by_event_orders_by_creation_and_scopes_to_event(
    store: InMemoryTaskStore,
    event_id: EventId,
) {
    let later = task_at(event_id, "Second", 5);
    let earlier = task_at(event_id, "First", 1);
    let foreign = task_at(EventId::new(), "Elsewhere", 0);
    for task in [&later, &earlier, &foreign] {
        store.create(task).await.expect("create should succeed");
    }

    let listed = store
        .list_by_event(event_id, false)
        .await
        .expect("listing should succeed");

    assert_eq!(titles(&listed), ["First", "Second"]);
}

#[rstest]
#[case::without_done(false, &["Open"][..])]
#[case::with_done(true, &["Open", "Finished"][..])]
#[tokio::test(flavor = "multi_thread")]
async fn list_by_event_filters_done_and_deleted(
    store: InMemoryTaskStore,
    event_id: EventId,
    #[case] include_done: bool,
    #[case] expected: &[&str],
) {
    let open = task_at(event_id, "Open", 0);
    let finished = task_at(event_id, "Finished", 1)
        .merged(&TaskUpdate::new().with_status(TaskStatus::Done), super::helpers::at_minute(2));
    let removed = task_at(event_id, "Removed", 2);
    for task in [&open, &finished, &removed] {
        store.create(task).await.expect("create should succeed");
    }
    store
        .soft_delete(&[removed.id()])
        .await
        .expect("soft delete should succeed");

    let listed = store
        .list_by_event(event_id, include_done)
        .await
        .expect("listing should succeed");

    assert_eq!(titles(&listed), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_active_spans_events(store: InMemoryTaskStore, event_id: EventId) {
    let here = task_at(event_id, "Here", 0);
    let there = task_at(EventId::new(), "There", 1);
    let done = task_at(event_id, "Done", 2)
        .merged(&TaskUpdate::new().with_status(TaskStatus::Done), super::helpers::at_minute(3));
    for task in [&here, &there, &done] {
        store.create(task).await.expect("create should succeed");
    }

    let active = store.list_active().await.expect("listing should succeed");

    assert_eq!(titles(&active), ["Here", "There"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn soft_delete_counts_only_newly_deleted_tasks(store: InMemoryTaskStore, event_id: EventId) {
    let first = task_at(event_id, "First", 0);
    let second = task_at(event_id, "Second", 1);
    for task in [&first, &second] {
        store.create(task).await.expect("create should succeed");
    }

    let initial = store
        .soft_delete(&[first.id(), TaskId::new()])
        .await
        .expect("soft delete should succeed");
    let repeated = store
        .soft_delete(&[first.id(), second.id()])
        .await
        .expect("soft delete should succeed");

    assert_eq!((initial, repeated), (1, 1));
    let kept = store
        .find_by_id(first.id())
        .await
        .expect("lookup should succeed")
        .expect("soft-deleted rows remain readable");
    assert!(kept.is_deleted());
}
