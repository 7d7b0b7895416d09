//! In-memory classification and workbasket catalogue.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{
        ClassificationKey, ClassificationSummary, DomainName, WorkbasketId, WorkbasketSummary,
    },
    ports::{ClassificationLookup, ReferenceDataError, WorkbasketDirectory},
};

/// Thread-safe catalogue of classifications and workbaskets.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceData {
    state: Arc<RwLock<ReferenceState>>,
}

#[derive(Debug, Default)]
struct ReferenceState {
    classifications: HashMap<(ClassificationKey, DomainName), ClassificationSummary>,
    workbaskets: HashMap<WorkbasketId, WorkbasketSummary>,
}

fn lock_error(message: String) -> ReferenceDataError {
    ReferenceDataError::backend(std::io::Error::other(message))
}

impl InMemoryReferenceData {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a classification.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError`] when the lock is poisoned.
    pub fn put_classification(
        &self,
        classification: ClassificationSummary,
    ) -> Result<(), ReferenceDataError> {
        let mut state = self.state.write().map_err(|err| lock_error(err.to_string()))?;
        state.classifications.insert(
            (classification.key.clone(), classification.domain.clone()),
            classification,
        );
        Ok(())
    }

    /// Adds or replaces a workbasket.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError`] when the lock is poisoned.
    pub fn put_workbasket(&self, workbasket: WorkbasketSummary) -> Result<(), ReferenceDataError> {
        let mut state = self.state.write().map_err(|err| lock_error(err.to_string()))?;
        state.workbaskets.insert(workbasket.id.clone(), workbasket);
        Ok(())
    }
}

#[async_trait]
impl ClassificationLookup for InMemoryReferenceData {
    async fn find_classification(
        &self,
        key: &ClassificationKey,
        domain: &DomainName,
    ) -> Result<Option<ClassificationSummary>, ReferenceDataError> {
        let state = self.state.read().map_err(|err| lock_error(err.to_string()))?;
        Ok(state
            .classifications
            .get(&(key.clone(), domain.clone()))
            .cloned())
    }
}

#[async_trait]
impl WorkbasketDirectory for InMemoryReferenceData {
    async fn find_workbasket(
        &self,
        id: &WorkbasketId,
    ) -> Result<Option<WorkbasketSummary>, ReferenceDataError> {
        let state = self.state.read().map_err(|err| lock_error(err.to_string()))?;
        Ok(state.workbaskets.get(id).cloned())
    }
}
