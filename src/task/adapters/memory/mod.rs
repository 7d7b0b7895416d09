//! In-memory adapters for tests and embedded use.

mod authorization;
mod reference_data;
mod task;

pub use authorization::InMemoryAuthorizationGate;
pub use reference_data::InMemoryReferenceData;
pub use task::InMemoryTaskRepository;
