//! In-memory integration tests for holiday-aware scheduling.

use super::helpers::{EXPRESS, STANDARD, TestContext, at, german_context, request, user};
use gropius::service_level::domain::WorkingTimeConfig;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn easter_holidays_are_skipped(german_context: TestContext) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let task = german_context
        .service
        .create_task(&clerk, request(EXPRESS).with_planned(at(2024, 3, 28, 10)))
        .await?;

    eyre::ensure!(task.planned() == at(2024, 3, 28, 10), "planned must be kept");
    eyre::ensure!(
        task.due() == at(2024, 4, 2, 10),
        "due must skip Good Friday, the weekend and Easter Monday, got {}",
        task.due()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn planned_on_holiday_rolls_forward(german_context: TestContext) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let task = german_context
        .service
        .create_task(&clerk, request(EXPRESS).with_planned(at(2024, 12, 25, 7)))
        .await?;

    eyre::ensure!(task.planned() == at(2024, 12, 27, 7), "planned must roll past Christmas");
    eyre::ensure!(task.due() == at(2024, 12, 30, 7), "due must skip the weekend");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_only_request_derives_planned(german_context: TestContext) -> Result<(), eyre::Report> {
    let clerk = user("clerk");
    let task = german_context
        .service
        .create_task(&clerk, request(STANDARD).with_due(at(2024, 5, 21, 12)))
        .await?;

    // Labour Day, Ascension Day and Whit Monday fall inside the window.
    eyre::ensure!(
        task.planned() == at(2024, 4, 29, 12),
        "planned mismatch, got {}",
        task.planned()
    );
    Ok(())
}

#[rstest]
fn unknown_calendar_fields_are_rejected() {
    let result = WorkingTimeConfig::from_json(r#"{"weekends": ["Sat"]}"#);
    assert!(result.is_err());
}
