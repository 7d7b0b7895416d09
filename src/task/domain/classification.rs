//! Classification data consumed by the task lifecycle.

use super::{ClassificationKey, DomainName};
use crate::service_level::domain::ServiceLevel;
use serde::{Deserialize, Serialize};

/// The parts of a classification that shape a task's schedule and priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    /// Classification key.
    pub key: ClassificationKey,
    /// Domain the classification belongs to.
    pub domain: DomainName,
    /// Working-time budget between planned and due.
    pub service_level: ServiceLevel,
    /// Priority inherited by tasks.
    pub priority: i32,
}

impl ClassificationSummary {
    /// Creates a classification summary.
    #[must_use]
    pub const fn new(
        key: ClassificationKey,
        domain: DomainName,
        service_level: ServiceLevel,
        priority: i32,
    ) -> Self {
        Self {
            key,
            domain,
            service_level,
            priority,
        }
    }
}

/// Service level and priority in force for a task and its attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationProfile {
    /// The tightest service level among all classifications.
    pub service_level: ServiceLevel,
    /// The highest priority among all classifications.
    pub priority: i32,
}

impl ClassificationProfile {
    /// Combines the task's classification with its attachments'.
    ///
    /// The minimum service level governs the schedule; the maximum priority
    /// governs the task's priority.
    #[must_use]
    pub fn combine<'a>(
        task_classification: &ClassificationSummary,
        attachment_classifications: impl IntoIterator<Item = &'a ClassificationSummary>,
    ) -> Self {
        attachment_classifications.into_iter().fold(
            Self {
                service_level: task_classification.service_level,
                priority: task_classification.priority,
            },
            |profile, classification| Self {
                service_level: profile.service_level.min(classification.service_level),
                priority: profile.priority.max(classification.priority),
            },
        )
    }
}
