//! Shared fixtures for task service tests.

use std::sync::Arc;

use crate::service_level::domain::{ConfiguredCalendar, ServiceLevel, ServiceLevelCalculator};
use crate::task::{
    adapters::memory::{InMemoryAuthorizationGate, InMemoryReferenceData, InMemoryTaskRepository},
    domain::{
        ClassificationKey, ClassificationSummary, DomainName, ObjectReference, Task, UserId,
        WorkbasketId, WorkbasketSummary,
    },
    ports::Permission,
    services::{CreateTaskRequest, TaskLifecycleService},
};
use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::fixture;

pub(super) type TestService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryAuthorizationGate,
    InMemoryReferenceData,
    DefaultClock,
>;

pub(super) const DOMAIN: &str = "DOMAIN_A";
pub(super) const INBOX: &str = "WBI:INBOX";
pub(super) const ARCHIVE: &str = "WBI:ARCHIVE";
pub(super) const LOCKED: &str = "WBI:LOCKED";
pub(super) const STANDARD: &str = "L10000";
pub(super) const URGENT: &str = "L20000";
pub(super) const DAILY: &str = "L30000";

pub(super) struct Harness {
    pub(super) service: TestService,
    pub(super) repository: Arc<InMemoryTaskRepository>,
    pub(super) gate: Arc<InMemoryAuthorizationGate>,
    pub(super) reference_data: Arc<InMemoryReferenceData>,
    pub(super) calculator: Arc<ServiceLevelCalculator>,
}

pub(super) fn user(name: &str) -> UserId {
    UserId::new(name).expect("valid user id")
}

pub(super) fn workbasket(id: &str) -> WorkbasketId {
    WorkbasketId::new(id).expect("valid workbasket id")
}

pub(super) fn object_reference() -> ObjectReference {
    ObjectReference::new("Company", "System", "Instance", "Type", "Value")
        .expect("valid object reference")
}

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}

fn classification(key: &str, service_level: &str, priority: i32) -> ClassificationSummary {
    ClassificationSummary::new(
        ClassificationKey::new(key).expect("valid classification key"),
        DomainName::new(DOMAIN).expect("valid domain"),
        ServiceLevel::parse(service_level).expect("valid service level"),
        priority,
    )
}

impl Harness {
    pub(super) fn request(&self) -> CreateTaskRequest {
        CreateTaskRequest::new(INBOX, STANDARD, object_reference())
    }

    pub(super) async fn create(&self, caller: &UserId) -> Task {
        self.service
            .create_task(caller, self.request())
            .await
            .expect("task creation should succeed")
    }

    pub(super) async fn create_claimed(&self, caller: &UserId) -> Task {
        let task = self.create(caller).await;
        self.service
            .claim(caller, task.id())
            .await
            .expect("claim should succeed")
    }

    pub(super) async fn create_completed(&self, caller: &UserId) -> Task {
        let task = self.create(caller).await;
        self.service
            .force_complete(caller, task.id())
            .await
            .expect("force complete should succeed")
    }
}

/// Service over in-memory adapters where `alice` and `admin` hold every
/// permission on the inbox and archive, `bob` may only read and append in
/// the inbox, and nobody may use the locked workbasket.
#[fixture]
pub(super) fn harness() -> Harness {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let gate = Arc::new(InMemoryAuthorizationGate::new());
    let reference_data = Arc::new(InMemoryReferenceData::new());
    let domain = DomainName::new(DOMAIN).expect("valid domain");

    for id in [INBOX, ARCHIVE, LOCKED] {
        reference_data
            .put_workbasket(WorkbasketSummary::new(workbasket(id), domain.clone()))
            .expect("workbasket registration");
    }
    reference_data
        .put_classification(classification(STANDARD, "P13D", 1))
        .expect("classification registration");
    reference_data
        .put_classification(classification(URGENT, "P1D", 99))
        .expect("classification registration");
    reference_data
        .put_classification(classification(DAILY, "P24H", 5))
        .expect("classification registration");

    let all = [
        Permission::Read,
        Permission::Append,
        Permission::Transfer,
        Permission::Administer,
    ];
    for name in ["alice", "admin"] {
        for id in [INBOX, ARCHIVE] {
            gate.grant(&workbasket(id), &user(name), all)
                .expect("grant");
        }
    }
    gate.grant(
        &workbasket(INBOX),
        &user("bob"),
        [Permission::Read, Permission::Append],
    )
    .expect("grant");

    let calculator = Arc::new(ServiceLevelCalculator::with_calendar(
        ConfiguredCalendar::default(),
    ));
    let service = TaskLifecycleService::new(
        Arc::clone(&repository),
        Arc::clone(&gate),
        Arc::clone(&reference_data),
        Arc::clone(&calculator),
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        repository,
        gate,
        reference_data,
        calculator,
    }
}
