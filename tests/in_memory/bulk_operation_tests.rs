//! In-memory integration tests for bulk operations.

use super::helpers::{
    EXPRESS, OUTBOX, STANDARD, TestContext, at, context, request, user, workbasket,
};
use gropius::task::{domain::TaskId, services::TaskErrorKind};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn set_planned_uses_each_tasks_own_service_level(
    context: TestContext,
) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let standard = context.service.create_task(&clerk, request(STANDARD)).await?;
    let express = context.service.create_task(&clerk, request(EXPRESS)).await?;
    let planned = at(2024, 3, 8, 9);

    let result = context
        .service
        .set_planned_property_of_tasks(&clerk, planned, [standard.id(), express.id()])
        .await;
    eyre::ensure!(!result.contains_errors(), "no task should fail");

    let standard_after = context.service.get_task(&clerk, standard.id()).await?;
    let express_after = context.service.get_task(&clerk, express.id()).await?;
    eyre::ensure!(standard_after.due() == at(2024, 3, 27, 9), "standard due mismatch");
    eyre::ensure!(express_after.due() == at(2024, 3, 11, 9), "express due mismatch");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_transfer_reports_missing_tasks_and_moves_the_rest(
    context: TestContext,
) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let task = context.service.create_task(&clerk, request(STANDARD)).await?;
    let missing = TaskId::new();

    let result = context
        .service
        .transfer_tasks(&clerk, &workbasket(OUTBOX), [missing, task.id(), missing])
        .await?;

    eyre::ensure!(result.error_count() == 1, "only the missing id should fail");
    let kind = result.error_for(&missing).map(|err| err.kind());
    eyre::ensure!(kind == Some(TaskErrorKind::TaskNotFound), "unexpected {kind:?}");
    let moved = context.service.get_task(&clerk, task.id()).await?;
    eyre::ensure!(moved.workbasket_id() == &workbasket(OUTBOX), "task must move");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_owner_reset_clears_owner(context: TestContext) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let other = user("other-clerk");
    let task = context.service.create_task(&clerk, request(STANDARD)).await?;
    let assigned = context
        .service
        .set_owner_of_tasks(&clerk, Some(&other), [task.id()])
        .await;
    eyre::ensure!(!assigned.contains_errors(), "assignment should succeed");

    let cleared = context
        .service
        .set_owner_of_tasks(&clerk, None, [task.id()])
        .await;
    eyre::ensure!(!cleared.contains_errors(), "reset should succeed");

    let after = context.service.get_task(&clerk, task.id()).await?;
    eyre::ensure!(after.owner().is_none(), "owner must be cleared");
    Ok(())
}
