//! Precondition table for task lifecycle actions.
//!
//! Default and forced variants of an action share one row of the table and
//! differ only in the state and owner rules they apply. Callers check these
//! rules after authorization has succeeded.

use super::{TaskDomainError, TaskId, TaskState, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lifecycle action guarded by state and ownership rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Take ownership of the task.
    Claim,
    /// Release ownership of the task.
    CancelClaim,
    /// Finish the task.
    Complete,
    /// Cancel the task.
    Cancel,
    /// Terminate the task administratively.
    Terminate,
    /// Move the task to another workbasket.
    Transfer,
    /// Assign an owner without claiming.
    SetOwner,
}

impl TaskAction {
    /// Returns a human-readable label for messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::CancelClaim => "cancel claim",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
            Self::Terminate => "terminate",
            Self::Transfer => "transfer",
            Self::SetOwner => "set owner",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects between the default rules and the relaxed forced rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionMode {
    /// Full state and ownership checks.
    #[default]
    Default,
    /// Relaxed checks used by the `force_*` operations.
    Forced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateRule {
    Exactly(TaskState),
    NonTerminal,
}

impl StateRule {
    fn admits(self, state: TaskState) -> bool {
        match self {
            Self::Exactly(expected) => expected == state,
            Self::NonTerminal => !state.is_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OwnerRule {
    Any,
    UnsetOrCaller,
    Caller,
}

impl OwnerRule {
    fn admits(self, owner: Option<&UserId>, caller: &UserId) -> bool {
        match self {
            Self::Any => true,
            Self::UnsetOrCaller => owner.is_none_or(|current| current == caller),
            Self::Caller => owner == Some(caller),
        }
    }
}

const fn precondition(action: TaskAction, mode: TransitionMode) -> (StateRule, OwnerRule) {
    use TransitionMode::{Default, Forced};
    match (action, mode) {
        (TaskAction::Claim, Default) => (
            StateRule::Exactly(TaskState::Ready),
            OwnerRule::UnsetOrCaller,
        ),
        (TaskAction::Claim, Forced) | (TaskAction::Complete, Forced) => {
            (StateRule::NonTerminal, OwnerRule::Any)
        }
        (TaskAction::CancelClaim, Default) | (TaskAction::Complete, Default) => {
            (StateRule::Exactly(TaskState::Claimed), OwnerRule::Caller)
        }
        (TaskAction::CancelClaim, Forced) => {
            (StateRule::Exactly(TaskState::Claimed), OwnerRule::Any)
        }
        (TaskAction::SetOwner, _) => (StateRule::Exactly(TaskState::Ready), OwnerRule::Any),
        (TaskAction::Cancel | TaskAction::Terminate | TaskAction::Transfer, _) => {
            (StateRule::NonTerminal, OwnerRule::Any)
        }
    }
}

/// Current facts about a task that the precondition table inspects.
#[derive(Debug, Clone, Copy)]
pub struct TransitionSubject<'a> {
    /// Task being acted upon.
    pub task_id: TaskId,
    /// Current lifecycle state.
    pub state: TaskState,
    /// Current owner, if any.
    pub owner: Option<&'a UserId>,
}

/// Checks that `caller` may perform `action` on the subject.
///
/// The state rule is evaluated before the owner rule, so a task in the wrong
/// state reports [`TaskDomainError::InvalidState`] even when the caller is
/// also not its owner.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidState`] or
/// [`TaskDomainError::InvalidOwner`] when the precondition is violated.
pub fn ensure_permitted(
    subject: TransitionSubject<'_>,
    action: TaskAction,
    mode: TransitionMode,
    caller: &UserId,
) -> Result<(), TaskDomainError> {
    let (state_rule, owner_rule) = precondition(action, mode);
    if !state_rule.admits(subject.state) {
        return Err(TaskDomainError::InvalidState {
            task_id: subject.task_id,
            state: subject.state,
            action,
        });
    }
    if !owner_rule.admits(subject.owner, caller) {
        return Err(TaskDomainError::InvalidOwner {
            task_id: subject.task_id,
            owner: subject.owner.cloned(),
            caller: caller.clone(),
        });
    }
    Ok(())
}
