//! Lifecycle and callback states of a task.

use super::{ParseCallbackStateError, ParseTaskStateError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Task is waiting to be claimed.
    Ready,
    /// Task is being worked on by its owner.
    Claimed,
    /// Task has been completed.
    Completed,
    /// Task has been cancelled.
    Cancelled,
    /// Task has been terminated by an administrator.
    Terminated,
}

impl TaskState {
    /// All lifecycle states in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Ready,
        Self::Claimed,
        Self::Completed,
        Self::Cancelled,
        Self::Terminated,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Claimed => "CLAIMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Terminated => "TERMINATED",
        }
    }

    /// Returns `true` for states that admit no further lifecycle transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Terminated)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "READY" => Ok(Self::Ready),
            "CLAIMED" => Ok(Self::Claimed),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            "TERMINATED" => Ok(Self::Terminated),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

/// Progress of the external system that must process a task's callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallbackState {
    /// No callback is expected.
    #[default]
    None,
    /// A callback still has to be processed.
    CallbackProcessingRequired,
    /// The callback has been processed.
    CallbackProcessingCompleted,
    /// The external system has claimed the callback for processing.
    Claimed,
}

impl CallbackState {
    /// All callback states in declaration order.
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::CallbackProcessingRequired,
        Self::CallbackProcessingCompleted,
        Self::Claimed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::CallbackProcessingRequired => "CALLBACK_PROCESSING_REQUIRED",
            Self::CallbackProcessingCompleted => "CALLBACK_PROCESSING_COMPLETED",
            Self::Claimed => "CLAIMED",
        }
    }

    /// Returns `true` when the callback no longer blocks deletion.
    #[must_use]
    pub const fn permits_deletion(self) -> bool {
        matches!(self, Self::None | Self::CallbackProcessingCompleted)
    }
}

impl fmt::Display for CallbackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CallbackState {
    type Error = ParseCallbackStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "NONE" => Ok(Self::None),
            "CALLBACK_PROCESSING_REQUIRED" => Ok(Self::CallbackProcessingRequired),
            "CALLBACK_PROCESSING_COMPLETED" => Ok(Self::CallbackProcessingCompleted),
            "CLAIMED" => Ok(Self::Claimed),
            _ => Err(ParseCallbackStateError(value.to_owned())),
        }
    }
}
