//! Error type shared by task lifecycle services.

use crate::service_level::domain::ServiceLevelError;
use crate::task::{
    domain::{ClassificationKey, DomainName, ExternalId, TaskDomainError, TaskId, WorkbasketId},
    ports::{AuthorizationError, ReferenceDataError, TaskRepositoryError},
};
use thiserror::Error;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum TaskLifecycleError {
    /// No task has the given identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// No task has the given external identifier.
    #[error("no task with external id {0}")]
    ExternalIdNotFound(ExternalId),

    /// Authorization failed.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// Domain validation or a lifecycle precondition failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The referenced classification does not exist.
    #[error("classification {key} not found in domain {domain}")]
    ClassificationNotFound {
        /// Requested classification key.
        key: ClassificationKey,
        /// Domain searched.
        domain: DomainName,
    },

    /// The referenced workbasket does not exist.
    #[error("workbasket {0} not found")]
    WorkbasketNotFound(WorkbasketId),

    /// The caller's snapshot is stale or a concurrent write won.
    #[error("The task has already been updated by another user")]
    Concurrency(TaskId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),

    /// Reference data lookup failed.
    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(task_id) => Self::NotFound(task_id),
            TaskRepositoryError::ConcurrentModification(task_id) => Self::Concurrency(task_id),
            other => Self::Repository(other),
        }
    }
}

impl From<ServiceLevelError> for TaskLifecycleError {
    fn from(err: ServiceLevelError) -> Self {
        Self::Domain(TaskDomainError::ServiceLevel(err))
    }
}

/// Coarse classification of [`TaskLifecycleError`] for callers that only
/// need to know which rule failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskErrorKind {
    /// The task does not exist.
    TaskNotFound,
    /// The caller lacks a permission.
    NotAuthorized,
    /// The task's state forbids the operation.
    InvalidState,
    /// The caller does not own the task.
    InvalidOwner,
    /// The input is malformed or inconsistent.
    InvalidArgument,
    /// The write lost against a concurrent update.
    Concurrency,
    /// A referenced classification or workbasket does not exist.
    ReferenceNotFound,
    /// A collaborator failed.
    Infrastructure,
}

impl TaskLifecycleError {
    /// Returns the coarse kind of the error.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::NotFound(_) | Self::ExternalIdNotFound(_) => TaskErrorKind::TaskNotFound,
            Self::Authorization(AuthorizationError::NotAuthorized { .. }) => {
                TaskErrorKind::NotAuthorized
            }
            Self::Domain(err) => domain_kind(err),
            Self::ClassificationNotFound { .. } | Self::WorkbasketNotFound(_) => {
                TaskErrorKind::ReferenceNotFound
            }
            Self::Concurrency(_) => TaskErrorKind::Concurrency,
            Self::Repository(TaskRepositoryError::DuplicateExternalId(_)) => {
                TaskErrorKind::InvalidArgument
            }
            Self::Authorization(AuthorizationError::Backend(_))
            | Self::Repository(_)
            | Self::ReferenceData(_) => TaskErrorKind::Infrastructure,
        }
    }
}

const fn domain_kind(err: &TaskDomainError) -> TaskErrorKind {
    match err {
        TaskDomainError::InvalidState { .. }
        | TaskDomainError::CallbackNotProcessed(_)
        | TaskDomainError::NotCompleted { .. }
        | TaskDomainError::CallbackStateRejected { .. } => TaskErrorKind::InvalidState,
        TaskDomainError::InvalidOwner { .. } => TaskErrorKind::InvalidOwner,
        TaskDomainError::ServiceLevel(ServiceLevelError::InvalidConfig(_)) => {
            TaskErrorKind::Infrastructure
        }
        TaskDomainError::EmptyValue(_)
        | TaskDomainError::ImmutableField { .. }
        | TaskDomainError::ServiceLevel(_) => TaskErrorKind::InvalidArgument,
    }
}
