//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use gropius::service_level::domain::{
    ConfiguredCalendar, ServiceLevel, ServiceLevelCalculator, WorkingTimeConfig,
};
use gropius::task::{
    adapters::memory::{InMemoryAuthorizationGate, InMemoryReferenceData, InMemoryTaskRepository},
    domain::{
        ClassificationKey, ClassificationSummary, DomainName, ObjectReference, UserId,
        WorkbasketId, WorkbasketSummary,
    },
    ports::Permission,
    services::{CreateTaskRequest, TaskLifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type wired to in-memory adapters.
pub type TestService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryAuthorizationGate,
    InMemoryReferenceData,
    DefaultClock,
>;

/// Workbasket every clerk may fully use.
pub const INBOX: &str = "WBI:INBOX";
/// Second workbasket used as a transfer destination.
pub const OUTBOX: &str = "WBI:OUTBOX";
/// Classification with a thirteen working day service level.
pub const STANDARD: &str = "L10000";
/// Classification with a one working day service level.
pub const EXPRESS: &str = "L20000";

const DOMAIN: &str = "DOMAIN_A";

/// Working-time configuration with German public holidays.
pub const GERMAN_CALENDAR: &str = r#"{
    "weekend_days": ["Sat", "Sun"],
    "german_public_holidays_enabled": true,
    "corpus_christi_enabled": false
}"#;

/// Service plus the adapters it was built from.
pub struct TestContext {
    /// Service under test.
    pub service: TestService,
    /// Backing task store.
    pub repository: Arc<InMemoryTaskRepository>,
    /// Backing permission table.
    pub gate: Arc<InMemoryAuthorizationGate>,
}

/// Builds a user identifier.
///
/// # Panics
///
/// Panics when `name` is blank.
#[must_use]
pub fn user(name: &str) -> UserId {
    UserId::new(name).expect("valid user id")
}

/// Builds a workbasket identifier.
///
/// # Panics
///
/// Panics when `id` is blank.
#[must_use]
pub fn workbasket(id: &str) -> WorkbasketId {
    WorkbasketId::new(id).expect("valid workbasket id")
}

/// Builds a UTC instant on the hour.
///
/// # Panics
///
/// Panics when the date is invalid.
#[must_use]
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}

/// Builds a create request in the inbox with the given classification.
///
/// # Panics
///
/// Panics when the object reference is invalid.
#[must_use]
pub fn request(classification_key: &str) -> CreateTaskRequest {
    CreateTaskRequest::new(
        INBOX,
        classification_key,
        ObjectReference::new("ACME", "CRM", "prod", "Contract", "C-4711")
            .expect("valid object reference"),
    )
}

fn build(config: &WorkingTimeConfig) -> TestContext {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let gate = Arc::new(InMemoryAuthorizationGate::new());
    let reference_data = Arc::new(InMemoryReferenceData::new());
    let domain = DomainName::new(DOMAIN).expect("valid domain");

    for (key, service_level, priority) in [(STANDARD, "P13D", 2), (EXPRESS, "PT24H", 50)] {
        reference_data
            .put_classification(ClassificationSummary::new(
                ClassificationKey::new(key).expect("valid key"),
                domain.clone(),
                ServiceLevel::parse(service_level).expect("valid service level"),
                priority,
            ))
            .expect("classification registration");
    }
    for id in [INBOX, OUTBOX] {
        reference_data
            .put_workbasket(WorkbasketSummary::new(workbasket(id), domain.clone()))
            .expect("workbasket registration");
        for name in ["clerk", "other-clerk"] {
            gate.grant(
                &workbasket(id),
                &user(name),
                [Permission::Read, Permission::Append, Permission::Transfer],
            )
            .expect("grant");
        }
        gate.grant(
            &workbasket(id),
            &user("supervisor"),
            [
                Permission::Read,
                Permission::Append,
                Permission::Transfer,
                Permission::Administer,
            ],
        )
        .expect("grant");
    }

    let calendar = ConfiguredCalendar::from_config(config).expect("valid working-time config");
    let service = TaskLifecycleService::new(
        Arc::clone(&repository),
        Arc::clone(&gate),
        reference_data,
        Arc::new(ServiceLevelCalculator::with_calendar(calendar)),
        Arc::new(DefaultClock),
    );
    TestContext {
        service,
        repository,
        gate,
    }
}

/// Provides a context with a plain Saturday/Sunday weekend.
#[fixture]
pub fn context() -> TestContext {
    build(&WorkingTimeConfig::default())
}

/// Provides a context whose calendar observes German public holidays.
#[fixture]
pub fn german_context() -> TestContext {
    build(&WorkingTimeConfig::from_json(GERMAN_CALENDAR).expect("valid calendar document"))
}
