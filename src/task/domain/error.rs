//! Error types for task domain validation, transitions and parsing.

use super::{CallbackState, TaskAction, TaskId, TaskState, UserId};
use crate::service_level::domain::ServiceLevelError;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A mandatory text value is blank.
    #[error("{0} must not be empty")]
    EmptyValue(&'static str),

    /// The task's lifecycle state does not permit the action.
    #[error("task {task_id} is in state {state} and does not permit {action}")]
    InvalidState {
        /// Affected task.
        task_id: TaskId,
        /// State the task was found in.
        state: TaskState,
        /// Rejected action.
        action: TaskAction,
    },

    /// The caller is not the task's owner where ownership is required.
    #[error("task {task_id} is owned by {}, not by {caller}", owner_label(.owner.as_ref()))]
    InvalidOwner {
        /// Affected task.
        task_id: TaskId,
        /// Current owner, if any.
        owner: Option<UserId>,
        /// User who attempted the action.
        caller: UserId,
    },

    /// Deletion was refused because the callback is still pending.
    #[error("Task {0} cannot be deleted because its callback is not yet processed")]
    CallbackNotProcessed(TaskId),

    /// Non-forced deletion was refused because the task is not completed.
    #[error("Task {task_id} cannot be deleted because it is in state {state} instead of COMPLETED")]
    NotCompleted {
        /// Affected task.
        task_id: TaskId,
        /// State the task was found in.
        state: TaskState,
    },

    /// The callback state cannot move to the requested value.
    #[error(
        "callback state of task {task_id} cannot be set to {target} while the task is {state} with callback state {callback_state}"
    )]
    CallbackStateRejected {
        /// Affected task.
        task_id: TaskId,
        /// Lifecycle state of the task.
        state: TaskState,
        /// Current callback state.
        callback_state: CallbackState,
        /// Requested callback state.
        target: CallbackState,
    },

    /// An update tried to change a field that only dedicated operations may
    /// change.
    #[error("{field} of task {task_id} cannot be changed by an update")]
    ImmutableField {
        /// Affected task.
        task_id: TaskId,
        /// Name of the protected field.
        field: &'static str,
    },

    /// Planned and due dates could not be derived or are inconsistent.
    #[error(transparent)]
    ServiceLevel(#[from] ServiceLevelError),
}

fn owner_label(owner: Option<&UserId>) -> &str {
    owner.map_or("nobody", UserId::as_str)
}

/// Error returned while parsing task states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);

/// Error returned while parsing callback states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown callback state: {0}")]
pub struct ParseCallbackStateError(pub String);
