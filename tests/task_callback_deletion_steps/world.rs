//! Shared world state for callback-aware deletion BDD scenarios.

use std::sync::Arc;

use gropius::service_level::domain::{ConfiguredCalendar, ServiceLevel, ServiceLevelCalculator};
use gropius::task::{
    adapters::memory::{InMemoryAuthorizationGate, InMemoryReferenceData, InMemoryTaskRepository},
    domain::{
        ClassificationKey, ClassificationSummary, DomainName, ExternalId, Task, UserId,
        WorkbasketId, WorkbasketSummary,
    },
    ports::Permission,
    services::{TaskBulkResult, TaskLifecycleError, TaskLifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryAuthorizationGate,
    InMemoryReferenceData,
    DefaultClock,
>;

/// Workbasket all scenario tasks are created in.
pub const WORKBASKET: &str = "WBI:CALLBACKS";
/// Classification all scenario tasks use.
pub const CLASSIFICATION: &str = "L10000";

/// Scenario world for callback-aware deletion.
pub struct CallbackDeletionWorld {
    pub service: TestTaskService,
    pub task: Option<Task>,
    pub deletion_result: Option<Result<(), TaskLifecycleError>>,
    pub callback_result: Option<TaskBulkResult<ExternalId>>,
}

impl CallbackDeletionWorld {
    /// Creates a world where `supervisor` holds every permission.
    ///
    /// # Errors
    ///
    /// Returns an error when the reference data cannot be registered.
    pub fn new() -> Result<Self, eyre::Report> {
        let reference_data = Arc::new(InMemoryReferenceData::new());
        let gate = Arc::new(InMemoryAuthorizationGate::new());
        let domain = DomainName::new("DOMAIN_A")?;
        let workbasket_id = WorkbasketId::new(WORKBASKET)?;

        reference_data.put_workbasket(WorkbasketSummary::new(
            workbasket_id.clone(),
            domain.clone(),
        ))?;
        reference_data.put_classification(ClassificationSummary::new(
            ClassificationKey::new(CLASSIFICATION)?,
            domain,
            ServiceLevel::from_working_days(2),
            1,
        ))?;
        gate.grant(
            &workbasket_id,
            &UserId::new("supervisor")?,
            [
                Permission::Read,
                Permission::Append,
                Permission::Transfer,
                Permission::Administer,
            ],
        )?;

        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            gate,
            reference_data,
            Arc::new(ServiceLevelCalculator::with_calendar(
                ConfiguredCalendar::default(),
            )),
            Arc::new(DefaultClock),
        );

        Ok(Self {
            service,
            task: None,
            deletion_result: None,
            callback_result: None,
        })
    }

    /// Returns the task created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

/// Fixture that creates a new scenario world.
///
/// # Panics
///
/// Panics when the in-memory reference data cannot be set up.
#[fixture]
pub fn world() -> CallbackDeletionWorld {
    CallbackDeletionWorld::new().expect("scenario world setup")
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
