//! Bulk task operations.
//!
//! Each bulk operation deduplicates its input, applies the single-task rule
//! to every distinct key independently and collects per-key failures. A
//! failure for one key never affects the others.

use super::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
use crate::task::{
    domain::{
        BulkOperationResult, CallbackState, ExternalId, TaskId, TransitionMode, UserId,
        WorkbasketId,
    },
    ports::{AuthorizationGate, ClassificationLookup, TaskRepository, WorkbasketDirectory},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::future::Future;
use tracing::{info, warn};

/// Per-key failures of a bulk task operation.
pub type TaskBulkResult<K> = BulkOperationResult<K, TaskLifecycleError>;

/// Applies `apply` once per distinct key, in first-occurrence order.
async fn for_each_distinct<K, T, I, F, Fut>(
    operation: &'static str,
    keys: I,
    mut apply: F,
) -> TaskBulkResult<K>
where
    K: Ord + Clone + Display,
    I: IntoIterator<Item = K>,
    F: FnMut(K) -> Fut,
    Fut: Future<Output = TaskLifecycleResult<T>>,
{
    let mut seen = BTreeSet::new();
    let mut result = TaskBulkResult::new();
    let mut processed = 0_usize;
    for key in keys {
        if !seen.insert(key.clone()) {
            continue;
        }
        processed += 1;
        if let Err(err) = apply(key.clone()).await {
            warn!(operation, key = %key, error = %err, "bulk item failed");
            result.add_error(key, err);
        }
    }
    info!(
        operation,
        processed,
        failed = result.error_count(),
        "bulk operation finished"
    );
    result
}

impl<R, A, D, C> TaskLifecycleService<R, A, D, C>
where
    R: TaskRepository,
    A: AuthorizationGate,
    D: ClassificationLookup + WorkbasketDirectory,
    C: Clock + Send + Sync,
{
    /// Deletes every completed task in `ids`.
    ///
    /// Unknown ids, missing permissions, pending callbacks and non-completed
    /// tasks are reported per id.
    #[tracing::instrument(skip(self, ids))]
    pub async fn delete_tasks(
        &self,
        caller: &UserId,
        ids: impl IntoIterator<Item = TaskId>,
    ) -> TaskBulkResult<TaskId> {
        for_each_distinct("delete_tasks", ids, |id| {
            self.delete_with(caller, id, TransitionMode::Default)
        })
        .await
    }

    /// Completes every task in `ids` claimed by the caller.
    #[tracing::instrument(skip(self, ids))]
    pub async fn complete_tasks(
        &self,
        caller: &UserId,
        ids: impl IntoIterator<Item = TaskId>,
    ) -> TaskBulkResult<TaskId> {
        self.complete_all("complete_tasks", caller, ids, TransitionMode::Default)
            .await
    }

    /// Force-completes every non-terminal task in `ids`.
    #[tracing::instrument(skip(self, ids))]
    pub async fn force_complete_tasks(
        &self,
        caller: &UserId,
        ids: impl IntoIterator<Item = TaskId>,
    ) -> TaskBulkResult<TaskId> {
        self.complete_all("force_complete_tasks", caller, ids, TransitionMode::Forced)
            .await
    }

    async fn complete_all(
        &self,
        operation: &'static str,
        caller: &UserId,
        ids: impl IntoIterator<Item = TaskId>,
        mode: TransitionMode,
    ) -> TaskBulkResult<TaskId> {
        for_each_distinct(operation, ids, |id| self.complete_with(caller, id, mode)).await
    }

    /// Transfers every task in `ids` to the destination workbasket.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] without touching any task when the
    /// destination does not exist or the caller lacks `APPEND` on it.
    #[tracing::instrument(skip(self, ids))]
    pub async fn transfer_tasks(
        &self,
        caller: &UserId,
        destination_id: &WorkbasketId,
        ids: impl IntoIterator<Item = TaskId>,
    ) -> TaskLifecycleResult<TaskBulkResult<TaskId>> {
        let destination = self.open_destination(caller, destination_id).await?;
        Ok(for_each_distinct("transfer_tasks", ids, |id| {
            self.transfer_into(caller, id, &destination)
        })
        .await)
    }

    /// Sets or clears the owner of every ready task in `ids`.
    #[tracing::instrument(skip(self, ids))]
    pub async fn set_owner_of_tasks(
        &self,
        caller: &UserId,
        owner: Option<&UserId>,
        ids: impl IntoIterator<Item = TaskId>,
    ) -> TaskBulkResult<TaskId> {
        for_each_distinct("set_owner_of_tasks", ids, |id| {
            self.assign_owner(caller, id, owner)
        })
        .await
    }

    /// Sets `planned` on every task in `ids`, deriving each task's due from
    /// its own classifications.
    #[tracing::instrument(skip(self, ids))]
    pub async fn set_planned_property_of_tasks(
        &self,
        caller: &UserId,
        planned: DateTime<Utc>,
        ids: impl IntoIterator<Item = TaskId>,
    ) -> TaskBulkResult<TaskId> {
        for_each_distinct("set_planned_property_of_tasks", ids, |id| {
            self.reschedule_from_planned(caller, id, planned)
        })
        .await
    }

    /// Moves the callback state of every task in `external_ids` to `target`.
    ///
    /// Targeting [`CallbackState::None`] fails for every id.
    #[tracing::instrument(skip(self, external_ids))]
    pub async fn set_callback_state_for_tasks(
        &self,
        caller: &UserId,
        target: CallbackState,
        external_ids: impl IntoIterator<Item = ExternalId>,
    ) -> TaskBulkResult<ExternalId> {
        for_each_distinct(
            "set_callback_state_for_tasks",
            external_ids,
            |external_id| self.change_callback_state(caller, external_id, target),
        )
        .await
    }
}
