//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod authorization;
pub mod reference_data;
pub mod repository;

pub use authorization::{AuthorizationError, AuthorizationGate, Permission};
pub use reference_data::{ClassificationLookup, ReferenceDataError, WorkbasketDirectory};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
