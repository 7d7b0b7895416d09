//! Authorization port deciding workbasket permissions.

use crate::task::domain::{UserId, WorkbasketId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use thiserror::Error;

/// Workbasket permission required by a task operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// See and work on tasks in the workbasket.
    Read,
    /// Create tasks in, or transfer tasks into, the workbasket.
    Append,
    /// Transfer tasks out of the workbasket.
    Transfer,
    /// Terminate and delete tasks in the workbasket.
    Administer,
}

impl Permission {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Append => "APPEND",
            Self::Transfer => "TRANSFER",
            Self::Administer => "ADMINISTER",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission decision contract.
#[async_trait]
pub trait AuthorizationGate: Send + Sync {
    /// Checks that `caller` holds `permission` on `workbasket_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::NotAuthorized`] when the permission is
    /// missing, or [`AuthorizationError::Backend`] when the decision cannot
    /// be made.
    async fn check(
        &self,
        workbasket_id: &WorkbasketId,
        permission: Permission,
        caller: &UserId,
    ) -> Result<(), AuthorizationError>;
}

/// Errors returned by authorization gates.
#[derive(Debug, Clone, Error)]
pub enum AuthorizationError {
    /// The caller lacks the permission.
    #[error("user {caller} is not authorized for {permission} on workbasket {workbasket_id}")]
    NotAuthorized {
        /// User who attempted the operation.
        caller: UserId,
        /// Workbasket the permission was checked on.
        workbasket_id: WorkbasketId,
        /// Missing permission.
        permission: Permission,
    },

    /// The permission source failed.
    #[error("authorization backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuthorizationError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
