//! Given steps for callback-aware deletion BDD scenarios.

use super::world::{CLASSIFICATION, CallbackDeletionWorld, WORKBASKET, run_async};
use eyre::WrapErr;
use gropius::task::{
    domain::{CallbackState, ObjectReference, UserId},
    services::CreateTaskRequest,
};
use rstest_bdd_macros::given;

#[given("a task awaiting callback processing")]
fn task_awaiting_callback(world: &mut CallbackDeletionWorld) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(
        WORKBASKET,
        CLASSIFICATION,
        ObjectReference::new("ACME", "Billing", "prod", "Invoice", "INV-17")?,
    )
    .with_callback_state(CallbackState::CallbackProcessingRequired);
    let created = run_async(
        world
            .service
            .create_task(&UserId::new("supervisor")?, request),
    )
    .wrap_err("create task awaiting callback")?;
    world.task = Some(created);
    Ok(())
}

#[given(r#"the task has been completed by "{user}""#)]
fn task_completed_by(world: &mut CallbackDeletionWorld, user: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let completed = run_async(world.service.force_complete(&UserId::new(user)?, task_id))
        .wrap_err("complete task in scenario setup")?;
    world.task = Some(completed);
    Ok(())
}

#[given(r#"the callback state of the task is set to "{state}""#)]
fn callback_state_set_to(
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
    eyre::ensure!(
        !result.contains_errors(),
        "callback state change failed: {:?}",
        result.into_errors()
    );
    Ok(())
}
