//! Service-level arithmetic for task planned and due dates.
//!
//! A classification's service level is a budget of working days between the
//! moment a task is planned and the moment it is due. This module owns the
//! conversion between that budget and calendar instants:
//!
//! - Duration parsing in [`domain::ServiceLevel`]
//! - Working-day calendars in [`domain::WorkingTimeCalendar`] and the
//!   configuration-driven [`domain::ConfiguredCalendar`]
//! - Planned/due projection in [`domain::ServiceLevelCalculator`]
//!
//! Everything here is pure; the holiday source is configuration supplied by
//! the embedding application.

pub mod domain;

#[cfg(test)]
mod tests;
