//! Gropius: workbasket task management.
//!
//! The crate manages the lifecycle of human work items. Tasks live in
//! workbaskets, are claimed and completed by users, and carry planned and
//! due dates derived from their classifications' service levels over a
//! working-day calendar.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage, authorization and
//!   reference data
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`service_level`]: Working-day calendar and service-level arithmetic
//! - [`task`]: Task lifecycle, bulk operations and callback tracking

pub mod service_level;
pub mod task;
