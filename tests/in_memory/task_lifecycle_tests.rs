//! In-memory integration tests for task lifecycle operations.

use super::helpers::{INBOX, OUTBOX, STANDARD, TestContext, context, request, user, workbasket};
use gropius::task::{
    domain::{CallbackState, TaskState},
    ports::{Permission, TaskRepository},
    services::TaskErrorKind,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_travels_from_creation_to_deletion(context: TestContext) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let supervisor = user("supervisor");

    let created = context
        .service
        .create_task(&clerk, request(STANDARD).with_external_id("ETI:contract-4711"))
        .await?;
    eyre::ensure!(created.state() == TaskState::Ready, "new task must be ready");
    eyre::ensure!(created.due() > created.planned(), "due must follow planned");

    let claimed = context.service.claim(&clerk, created.id()).await?;
    eyre::ensure!(claimed.owner() == Some(&clerk), "claim must set the owner");

    let moved = context
        .service
        .transfer(&clerk, created.id(), &workbasket(OUTBOX))
        .await?;
    eyre::ensure!(
        moved.state() == TaskState::Claimed && moved.owner() == Some(&clerk),
        "transfer keeps state and owner"
    );

    let completed = context.service.complete(&clerk, created.id()).await?;
    eyre::ensure!(
        completed.completed().is_some(),
        "completion must stamp the completed instant"
    );

    context
        .service
        .delete_task(&supervisor, created.id())
        .await?;
    let remaining = context.repository.find_by_id(created.id()).await?;
    eyre::ensure!(remaining.is_none(), "deleted task must be gone");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clerk_cannot_delete_completed_task(context: TestContext) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let task = context.service.create_task(&clerk, request(STANDARD)).await?;
    context.service.force_complete(&clerk, task.id()).await?;

    let Err(err) = context.service.delete_task(&clerk, task.id()).await else {
        eyre::bail!("clerk without administer must not delete");
    };

    eyre::ensure!(err.kind() == TaskErrorKind::NotAuthorized, "unexpected {err}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn claimed_task_is_protected_from_other_clerks(
    context: TestContext,
) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let other = user("other-clerk");
    let task = context.service.create_task(&clerk, request(STANDARD)).await?;
    context.service.claim(&clerk, task.id()).await?;

    let claim_err = context
        .service
        .claim(&other, task.id())
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("second claim must fail"))?;
    let complete_err = context
        .service
        .complete(&other, task.id())
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("completion by non-owner must fail"))?;

    eyre::ensure!(claim_err.kind() == TaskErrorKind::InvalidState, "unexpected {claim_err}");
    eyre::ensure!(
        complete_err.kind() == TaskErrorKind::InvalidOwner,
        "unexpected {complete_err}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn withdrawn_transfer_permission_blocks_transfer(
    context: TestContext,
) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let task = context.service.create_task(&clerk, request(STANDARD)).await?;
    context
        .gate
        .revoke(&workbasket(INBOX), &clerk, Permission::Transfer)?;

    let Err(err) = context
        .service
        .transfer(&clerk, task.id(), &workbasket(OUTBOX))
        .await
    else {
        eyre::bail!("transfer without permission must fail");
    };

    eyre::ensure!(err.kind() == TaskErrorKind::NotAuthorized, "unexpected {err}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn external_id_is_released_after_deletion(context: TestContext) -> Result<(), eyre::Report> {
    let supervisor = user("supervisor");
    let first = context
        .service
        .create_task(&supervisor, request(STANDARD).with_external_id("ETI:reuse"))
        .await?;
    context
        .service
        .force_delete_task(&supervisor, first.id())
        .await?;

    let second = context
        .service
        .create_task(
            &supervisor,
            request(STANDARD)
                .with_external_id("ETI:reuse")
                .with_callback_state(CallbackState::CallbackProcessingRequired),
        )
        .await?;

    eyre::ensure!(second.id() != first.id(), "a new task must be created");
    eyre::ensure!(
        second.callback_state() == CallbackState::CallbackProcessingRequired,
        "callback state must be taken from the request"
    );
    Ok(())
}
