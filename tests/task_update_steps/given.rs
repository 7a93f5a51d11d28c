//! Given steps for task update BDD scenarios.

use super::world::{TaskUpdateWorld, run_async};
use eyre::WrapErr;
use planwright::task::{
    adapters::memory::StoreFaults,
    domain::EventId,
    services::CreateTaskRequest,
};
use rstest_bdd_macros::given;

#[given(r#"a task titled "{title}""#)]
fn task_titled(world: &mut TaskUpdateWorld, title: String) -> Result<(), eyre::Report> {
    let created = run_async(
        world
            .lifecycle
            .create(CreateTaskRequest::new(EventId::new(), title)),
    )
    .wrap_err("create task for update scenario")?;
    world.task = Some(created);
    Ok(())
}

#[given("change event inserts fail")]
fn change_event_inserts_fail(world: &mut TaskUpdateWorld) -> Result<(), eyre::Report> {
    world
        .store
        .set_faults(StoreFaults {
            fail_event_insert: true,
            ..StoreFaults::default()
        })
        .wrap_err("inject change event insert failure")
}

#[given("the task has been deleted")]
fn task_has_been_deleted(world: &mut TaskUpdateWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    run_async(world.lifecycle.delete(task_id)).wrap_err("delete task in scenario setup")
}
