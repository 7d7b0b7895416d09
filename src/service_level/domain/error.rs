//! Error types for service-level parsing and date projection.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use super::ServiceLevel;

/// Errors returned while parsing service levels or projecting dates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceLevelError {
    /// The duration text is not a supported ISO-8601 duration.
    #[error("invalid service level '{0}', expected an ISO-8601 duration such as P2D or PT36H")]
    InvalidDuration(String),

    /// Planned and due dates do not match the service level.
    #[error(
        "Cannot update a task with given planned {planned} and due date {due} not matching the service level {service_level}."
    )]
    Inconsistent {
        /// Requested planned instant.
        planned: DateTime<Utc>,
        /// Requested due instant.
        due: DateTime<Utc>,
        /// Effective service level of the task.
        service_level: ServiceLevel,
    },

    /// The calendar has no working day within the search horizon.
    #[error("no working day found within a year of {0}")]
    NoWorkingDay(NaiveDate),

    /// Date arithmetic left the representable range.
    #[error("date arithmetic overflowed while projecting from {0}")]
    OutOfRange(DateTime<Utc>),

    /// The working-time configuration is unusable.
    #[error("invalid working time configuration: {0}")]
    InvalidConfig(String),
}
