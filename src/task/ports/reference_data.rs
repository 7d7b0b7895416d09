//! Lookup ports for classifications and workbaskets.

use crate::task::domain::{
    ClassificationKey, ClassificationSummary, DomainName, WorkbasketId, WorkbasketSummary,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Classification lookup contract.
#[async_trait]
pub trait ClassificationLookup: Send + Sync {
    /// Finds a classification by key within a domain.
    ///
    /// Returns `None` when the classification does not exist.
    async fn find_classification(
        &self,
        key: &ClassificationKey,
        domain: &DomainName,
    ) -> Result<Option<ClassificationSummary>, ReferenceDataError>;
}

/// Workbasket lookup contract.
#[async_trait]
pub trait WorkbasketDirectory: Send + Sync {
    /// Finds a workbasket by identifier.
    ///
    /// Returns `None` when the workbasket does not exist.
    async fn find_workbasket(
        &self,
        id: &WorkbasketId,
    ) -> Result<Option<WorkbasketSummary>, ReferenceDataError>;
}

/// Errors returned by reference-data lookups.
#[derive(Debug, Clone, Error)]
#[error("reference data lookup failed: {0}")]
pub struct ReferenceDataError(pub Arc<dyn std::error::Error + Send + Sync>);

impl ReferenceDataError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
