//! Workbasket data consumed by the task lifecycle.

use super::{DomainName, WorkbasketId};
use serde::{Deserialize, Serialize};

/// The parts of a workbasket a task needs when it is routed there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkbasketSummary {
    /// Workbasket identifier.
    pub id: WorkbasketId,
    /// Domain of the workbasket, inherited by its tasks.
    pub domain: DomainName,
}

impl WorkbasketSummary {
    /// Creates a workbasket summary.
    #[must_use]
    pub const fn new(id: WorkbasketId, domain: DomainName) -> Self {
        Self { id, domain }
    }
}
