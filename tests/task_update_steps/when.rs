//! When steps for task update BDD scenarios.

use super::world::{TaskUpdateWorld, run_async};
use planwright::task::domain::TaskUpdateForm;
use rstest_bdd_macros::when;

fn submit(
    world: &mut TaskUpdateWorld,
    form: TaskUpdateForm,
    trigger_ai: bool,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.coordinator.update(task_id, form, trigger_ai));
    if let Ok(ref updated) = result {
        world.task = Some(updated.clone());
    }
    world.last_update = Some(result);
    Ok(())
}

#[when(r#"the status is changed to "{status}""#)]
fn status_changed(world: &mut TaskUpdateWorld, status: String) -> Result<(), eyre::Report> {
    let form = TaskUpdateForm {
        status: Some(status),
        ..TaskUpdateForm::default()
    };
    submit(world, form, false)
}

#[when(r#"the form is submitted with title "{title}""#)]
fn form_with_title(world: &mut TaskUpdateWorld, title: String) -> Result<(), eyre::Report> {
    let form = TaskUpdateForm {
        title: Some(title),
        ..TaskUpdateForm::default()
    };
    submit(world, form, false)
}

#[when("the form is submitted with subtask drafting")]
fn form_with_drafting(world: &mut TaskUpdateWorld) -> Result<(), eyre::Report> {
    submit(world, TaskUpdateForm::default(), true)
}
