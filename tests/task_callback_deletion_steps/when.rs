//! When steps for callback-aware deletion BDD scenarios.

use super::world::{CallbackDeletionWorld, run_async};
use eyre::WrapErr;
use gropius::task::domain::{CallbackState, UserId};
use rstest_bdd_macros::when;

#[when(r#""{user}" claims the task"#)]
fn claim(world: &mut CallbackDeletionWorld, user: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let claimed = run_async(world.service.claim(&UserId::new(user)?, task_id))
        .wrap_err("claim task")?;
    world.task = Some(claimed);
    Ok(())
}

#[when(r#""{user}" completes the task"#)]
fn complete(world: &mut CallbackDeletionWorld, user: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let completed = run_async(world.service.complete(&UserId::new(user)?, task_id))
        .wrap_err("complete task")?;
    world.task = Some(completed);
    Ok(())
}

#[when(r#""{user}" force deletes the task"#)]
fn force_delete(world: &mut CallbackDeletionWorld, user: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.service.force_delete_task(&UserId::new(user)?, task_id));
    world.deletion_result = Some(result);
    Ok(())
}

#[when(r#""{user}" deletes the task"#)]
fn delete(world: &mut CallbackDeletionWorld, user: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.service.delete_task(&UserId::new(user)?, task_id));
    world.deletion_result = Some(result);
    Ok(())
}

#[when(r#"the callback state of the task is changed to "{state}""#)]
fn change_callback_state(
    world: &mut CallbackDeletionWorld,
    state: String,
) -> Result<(), eyre::Report> {
    let target = CallbackState::try_from(state.as_str())?;
    let external_id = world.task()?.external_id().clone();
    let result = run_async(world.service.set_callback_state_for_tasks(
        &UserId::new("supervisor")?,
        target,
        [external_id],
    ));
    world.callback_result = Some(result);
    Ok(())
}
