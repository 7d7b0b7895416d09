//! Aggregated outcome of an operation applied to many tasks.

use std::collections::BTreeMap;

/// Per-key failures of a bulk operation.
///
/// Keys absent from the result succeeded. A result without errors means
/// every distinct key was processed successfully, including the trivial
/// case of an empty input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOperationResult<K, E>
where
    K: Ord,
{
    errors: BTreeMap<K, E>,
}

impl<K, E> BulkOperationResult<K, E>
where
    K: Ord,
{
    /// Creates an empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Records the failure for `key`, replacing any earlier one.
    pub fn add_error(&mut self, key: K, error: E) {
        self.errors.insert(key, error);
    }

    /// Returns `true` when at least one key failed.
    #[must_use]
    pub fn contains_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the failed keys in ascending order.
    pub fn failed_ids(&self) -> impl Iterator<Item = &K> {
        self.errors.keys()
    }

    /// Returns the failure recorded for `key`, if any.
    #[must_use]
    pub fn error_for(&self, key: &K) -> Option<&E> {
        self.errors.get(key)
    }

    /// Returns the number of failed keys.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Consumes the result, returning the failures.
    #[must_use]
    pub fn into_errors(self) -> BTreeMap<K, E> {
        self.errors
    }
}

impl<K, E> Default for BulkOperationResult<K, E>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}
