//! Optimistic concurrency check for caller-held task snapshots.

use super::{TaskLifecycleError, TaskLifecycleResult};
use crate::task::domain::Task;

/// Rejects a snapshot whose `modified` stamp no longer matches the stored
/// task.
///
/// # Errors
///
/// Returns [`TaskLifecycleError::Concurrency`] when another write landed
/// after the snapshot was taken.
pub fn ensure_not_stale(snapshot: &Task, persisted: &Task) -> TaskLifecycleResult<()> {
    if snapshot.modified() != persisted.modified() {
        return Err(TaskLifecycleError::Concurrency(snapshot.id()));
    }
    Ok(())
}
