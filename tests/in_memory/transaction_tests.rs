//! Unit-of-work semantics of the in-memory store.

use super::helpers::{at_minute, event_id, store, task_at};
use planwright::task::{
    adapters::memory::{InMemoryTaskStore, StoreFaults},
    domain::{ChangeEvent, EventId, TaskSnapshot, TaskUpdate, diff},
    ports::{TaskStore, TaskStoreError},
};
use rstest::rstest;

async fn seeded(store: &InMemoryTaskStore, event_id: EventId) -> TaskSnapshot {
    let task = task_at(event_id, "Book venue", 0);
    store.create(&task).await.expect("create should succeed");
    task
}

fn renamed(task: &TaskSnapshot) -> (TaskSnapshot, ChangeEvent) {
    let now = at_minute(10);
    let next = task.merged(&TaskUpdate::new().with_title("Book hall"), now);
    let event = ChangeEvent::updated(task.id(), diff(task, &next), now);
    (next, event)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn committed_work_is_visible(store: InMemoryTaskStore, event_id: EventId) {
    let task = seeded(&store, event_id).await;
    let (next, event) = renamed(&task);
    let (expected_task, expected_event) = (next.clone(), event.clone());

    store
        .run_in_transaction(move |transaction| {
            transaction.update_task(&next)?;
            transaction.insert_change_event(&event)
        })
        .await
        .expect("transaction should commit");

    let stored = store.find_by_id(task.id()).await.expect("lookup should succeed");
    let history = store
        .list_change_events(task.id())
        .await
        .expect("history should load");
    assert_eq!(stored, Some(expected_task));
    assert_eq!(history, [expected_event]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_work_leaves_no_trace(store: InMemoryTaskStore, event_id: EventId) {
    let task = seeded(&store, event_id).await;
    let (next, _) = renamed(&task);
    let missing = task_at(event_id, "Never stored", 1);

    let err = store
        .run_in_transaction(move |transaction| {
            transaction.update_task(&next)?;
            transaction.update_task(&missing)
        })
        .await
        .expect_err("transaction should fail");

    assert!(matches!(err, TaskStoreError::NotFound(_)));
    let stored = store.find_by_id(task.id()).await.expect("lookup should succeed");
    assert_eq!(stored, Some(task));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transaction_reads_its_own_writes(store: InMemoryTaskStore, event_id: EventId) {
    let task = seeded(&store, event_id).await;
    let (next, _) = renamed(&task);
    let id = task.id();

    let observed = store
        .run_in_transaction(move |transaction| {
            transaction.update_task(&next)?;
            transaction.find_task(id)
        })
        .await
        .expect("transaction should commit");

    assert_eq!(observed.map(|found| found.title().to_owned()), Some("Book hall".to_owned()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_commit_discards_work(store: InMemoryTaskStore, event_id: EventId) {
    let task = seeded(&store, event_id).await;
    let (next, event) = renamed(&task);
    store
        .set_faults(StoreFaults {
            fail_commit: true,
            ..StoreFaults::default()
        })
        .expect("faults should apply");

    let err = store
        .run_in_transaction(move |transaction| {
            transaction.update_task(&next)?;
            transaction.insert_change_event(&event)
        })
        .await
        .expect_err("commit should fail");

    assert!(matches!(err, TaskStoreError::Persistence(_)));
    assert!(
        store
            .all_change_events()
            .expect("events should load")
            .is_empty()
    );
    let stored = store.find_by_id(task.id()).await.expect("lookup should succeed");
    assert_eq!(stored, Some(task));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_rollback_reports_both_errors(store: InMemoryTaskStore, event_id: EventId) {
    let task = seeded(&store, event_id).await;
    let (next, event) = renamed(&task);
    store
        .set_faults(StoreFaults {
            fail_event_insert: true,
            fail_rollback: true,
            ..StoreFaults::default()
        })
        .expect("faults should apply");

    let err = store
        .run_in_transaction(move |transaction| {
            transaction.update_task(&next)?;
            transaction.insert_change_event(&event)
        })
        .await
        .expect_err("transaction should fail");

    match err {
        TaskStoreError::RollbackFailed { original, rollback } => {
            assert!(original.to_string().contains("change event insert"));
            assert!(rollback.to_string().contains("rollback"));
        }
        other => panic!("expected rollback failure, got {other:?}"),
    }
}
