//! In-memory authorization gate backed by explicit grants.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{UserId, WorkbasketId},
    ports::{AuthorizationError, AuthorizationGate, Permission},
};

/// Authorization gate answering from an in-memory grant table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthorizationGate {
    grants: Arc<RwLock<HashMap<(WorkbasketId, UserId), BTreeSet<Permission>>>>,
}

impl InMemoryAuthorizationGate {
    /// Creates a gate without any grants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `permissions` on `workbasket_id` to `user`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::Backend`] when the lock is poisoned.
    pub fn grant(
        &self,
        workbasket_id: &WorkbasketId,
        user: &UserId,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<(), AuthorizationError> {
        let mut grants = self
            .grants
            .write()
            .map_err(|err| AuthorizationError::backend(std::io::Error::other(err.to_string())))?;
        grants
            .entry((workbasket_id.clone(), user.clone()))
            .or_default()
            .extend(permissions);
        Ok(())
    }

    /// Withdraws a single permission.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::Backend`] when the lock is poisoned.
    pub fn revoke(
        &self,
        workbasket_id: &WorkbasketId,
        user: &UserId,
        permission: Permission,
    ) -> Result<(), AuthorizationError> {
        let mut grants = self
            .grants
            .write()
            .map_err(|err| AuthorizationError::backend(std::io::Error::other(err.to_string())))?;
        if let Some(held) = grants.get_mut(&(workbasket_id.clone(), user.clone())) {
            held.remove(&permission);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthorizationGate for InMemoryAuthorizationGate {
    async fn check(
        &self,
        workbasket_id: &WorkbasketId,
        permission: Permission,
        caller: &UserId,
    ) -> Result<(), AuthorizationError> {
        let grants = self
            .grants
            .read()
            .map_err(|err| AuthorizationError::backend(std::io::Error::other(err.to_string())))?;
        let granted = grants
            .get(&(workbasket_id.clone(), caller.clone()))
            .is_some_and(|held| held.contains(&permission));
        if granted {
            Ok(())
        } else {
            Err(AuthorizationError::NotAuthorized {
                caller: caller.clone(),
                workbasket_id: workbasket_id.clone(),
                permission,
            })
        }
    }
}
