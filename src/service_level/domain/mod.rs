//! Domain model for service-level calculation.

mod calculator;
mod calendar;
mod config;
mod duration;
mod error;

pub use calculator::{Schedule, ServiceLevelCalculator};
pub use calendar::{ConfiguredCalendar, WorkingTimeCalendar, easter_sunday};
pub use config::{CustomHoliday, WorkingTimeConfig};
pub use duration::ServiceLevel;
pub use error::ServiceLevelError;
