//! Task lifecycle management.
//!
//! Tasks are units of work queued in workbaskets. This module creates them,
//! moves them through `READY`, `CLAIMED` and the terminal states, transfers
//! them between workbaskets, tracks the external callback protocol and keeps
//! planned and due dates consistent with classification service levels.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
