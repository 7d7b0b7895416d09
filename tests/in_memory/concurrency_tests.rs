//! In-memory integration tests for competing writers.

use super::helpers::{STANDARD, TestContext, context, request, user};
use gropius::task::{domain::TaskState, services::TaskErrorKind};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_one_of_two_concurrent_claims_wins(context: TestContext) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let other = user("other-clerk");
    let task = context.service.create_task(&clerk, request(STANDARD)).await?;

    let (first, second) = tokio::join!(
        context.service.claim(&clerk, task.id()),
        context.service.claim(&other, task.id()),
    );

    let winners = [first.is_ok(), second.is_ok()]
        .iter()
        .filter(|won| **won)
        .count();
    eyre::ensure!(winners == 1, "exactly one claim must win, got {winners}");
    let loser = first.err().or(second.err()).ok_or_else(|| eyre::eyre!("missing loser"))?;
    eyre::ensure!(
        matches!(
            loser.kind(),
            TaskErrorKind::InvalidState | TaskErrorKind::Concurrency
        ),
        "unexpected {loser}"
    );

    let stored = context.service.get_task(&clerk, task.id()).await?;
    eyre::ensure!(stored.state() == TaskState::Claimed, "task must be claimed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_after_foreign_write_is_rejected(context: TestContext) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let task = context.service.create_task(&clerk, request(STANDARD)).await?;
    let mut snapshot = task.clone();
    snapshot.set_custom_attribute("note", "first draft");

    context.service.claim(&user("other-clerk"), task.id()).await?;
    let Err(err) = context.service.update_task(&clerk, &snapshot).await else {
        eyre::bail!("stale update must fail");
    };

    eyre::ensure!(err.kind() == TaskErrorKind::Concurrency, "unexpected {err}");
    Ok(())
}
