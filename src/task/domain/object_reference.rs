//! Reference to the business object a task or attachment is about.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};

/// Fully qualified reference to an object in an external system.
///
/// All five parts are mandatory and non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectReference {
    company: String,
    system: String,
    system_instance: String,
    reference_type: String,
    value: String,
}

impl ObjectReference {
    /// Creates a validated object reference.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyValue`] naming the first blank part.
    pub fn new(
        company: impl Into<String>,
        system: impl Into<String>,
        system_instance: impl Into<String>,
        reference_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            company: required(company.into(), "object reference company")?,
            system: required(system.into(), "object reference system")?,
            system_instance: required(system_instance.into(), "object reference system instance")?,
            reference_type: required(reference_type.into(), "object reference type")?,
            value: required(value.into(), "object reference value")?,
        })
    }

    /// Returns the owning company.
    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    /// Returns the external system.
    #[must_use]
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Returns the external system instance.
    #[must_use]
    pub fn system_instance(&self) -> &str {
        &self.system_instance
    }

    /// Returns the object type.
    #[must_use]
    pub fn reference_type(&self) -> &str {
        &self.reference_type
    }

    /// Returns the object value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

fn required(value: String, field: &'static str) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyValue(field));
    }
    Ok(trimmed.to_owned())
}
