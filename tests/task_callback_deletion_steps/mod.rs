//! Step definitions for callback-aware deletion scenarios.

mod given;
mod when;
pub mod world;
