//! Projection between planned and due instants in working time.

use super::{ServiceLevel, ServiceLevelError, WorkingTimeCalendar};
use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// Number of consecutive non-working days tolerated before a calendar is
/// considered to have no working days at all.
const SEARCH_HORIZON_DAYS: u32 = 366;

/// Planned and due instants of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Instant at which work on the task is planned to start.
    pub planned: DateTime<Utc>,
    /// Instant by which the task must be finished.
    pub due: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Converts service levels into planned/due instants and back.
///
/// Working days are evaluated on the UTC calendar date of an instant; the
/// time of day is carried through unchanged.
#[derive(Clone)]
pub struct ServiceLevelCalculator {
    calendar: Arc<dyn WorkingTimeCalendar>,
}

impl fmt::Debug for ServiceLevelCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceLevelCalculator").finish_non_exhaustive()
    }
}

impl ServiceLevelCalculator {
    /// Creates a calculator backed by a shared calendar.
    #[must_use]
    pub fn new(calendar: Arc<dyn WorkingTimeCalendar>) -> Self {
        Self { calendar }
    }

    /// Creates a calculator owning the given calendar.
    #[must_use]
    pub fn with_calendar(calendar: impl WorkingTimeCalendar + 'static) -> Self {
        Self::new(Arc::new(calendar))
    }

    /// Returns `true` when the UTC date of `instant` is a working day.
    #[must_use]
    pub fn is_working_day(&self, instant: DateTime<Utc>) -> bool {
        self.calendar.is_working_day(instant.date_naive())
    }

    /// Moves `instant` forward to the first working day, keeping the time of
    /// day. Working-day instants are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceLevelError::NoWorkingDay`] when the calendar has no
    /// working day within a year, or [`ServiceLevelError::OutOfRange`] on
    /// date overflow.
    pub fn roll_forward(&self, instant: DateTime<Utc>) -> Result<DateTime<Utc>, ServiceLevelError> {
        if self.is_working_day(instant) {
            return Ok(instant);
        }
        self.next_working_day(instant, Direction::Forward)
    }

    /// Returns the instant `days` working days after `start`.
    ///
    /// Each step lands on the next working day strictly after the current
    /// one, so a start on a non-working day counts from that day.
    ///
    /// # Errors
    ///
    /// See [`Self::roll_forward`].
    pub fn add_working_days(
        &self,
        start: DateTime<Utc>,
        days: u32,
    ) -> Result<DateTime<Utc>, ServiceLevelError> {
        self.walk(start, days, Direction::Forward)
    }

    /// Returns the instant `days` working days before `start`.
    ///
    /// # Errors
    ///
    /// See [`Self::roll_forward`].
    pub fn subtract_working_days(
        &self,
        start: DateTime<Utc>,
        days: u32,
    ) -> Result<DateTime<Utc>, ServiceLevelError> {
        self.walk(start, days, Direction::Backward)
    }

    /// Derives the due instant from a planned instant.
    ///
    /// A planned instant on a non-working day is first rolled forward.
    ///
    /// # Errors
    ///
    /// See [`Self::roll_forward`].
    pub fn schedule_from_planned(
        &self,
        planned: DateTime<Utc>,
        service_level: ServiceLevel,
    ) -> Result<Schedule, ServiceLevelError> {
        let rolled_planned = self.roll_forward(planned)?;
        let due = self.add_working_days(rolled_planned, service_level.working_days())?;
        Ok(Schedule {
            planned: rolled_planned,
            due,
        })
    }

    /// Derives the planned instant from a due instant.
    ///
    /// A due instant on a non-working day is rolled forward, not backward,
    /// before walking back by the service level.
    ///
    /// # Errors
    ///
    /// See [`Self::roll_forward`].
    pub fn schedule_from_due(
        &self,
        due: DateTime<Utc>,
        service_level: ServiceLevel,
    ) -> Result<Schedule, ServiceLevelError> {
        let rolled_due = self.roll_forward(due)?;
        let planned = self.subtract_working_days(rolled_due, service_level.working_days())?;
        Ok(Schedule {
            planned,
            due: rolled_due,
        })
    }

    /// Checks that `due` is exactly `planned` plus the service level.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceLevelError::Inconsistent`] when the dates disagree
    /// with the service level.
    pub fn validate_schedule(
        &self,
        planned: DateTime<Utc>,
        due: DateTime<Utc>,
        service_level: ServiceLevel,
    ) -> Result<Schedule, ServiceLevelError> {
        let expected = self.schedule_from_planned(planned, service_level)?;
        if expected.due != due {
            return Err(ServiceLevelError::Inconsistent {
                planned,
                due,
                service_level,
            });
        }
        Ok(expected)
    }

    /// Resolves the schedule for a create or update request.
    ///
    /// `planned` and `due` carry only the values the caller supplied or
    /// changed. When neither is present the schedule is projected forward
    /// from `fallback_planned`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceLevelError::Inconsistent`] when both values are
    /// supplied and disagree, or a calendar error from the projection.
    pub fn resolve(
        &self,
        planned: Option<DateTime<Utc>>,
        due: Option<DateTime<Utc>>,
        fallback_planned: DateTime<Utc>,
        service_level: ServiceLevel,
    ) -> Result<Schedule, ServiceLevelError> {
        match (planned, due) {
            (Some(planned_at), Some(due_at)) => {
                self.validate_schedule(planned_at, due_at, service_level)
            }
            (Some(planned_at), None) => self.schedule_from_planned(planned_at, service_level),
            (None, Some(due_at)) => self.schedule_from_due(due_at, service_level),
            (None, None) => self.schedule_from_planned(fallback_planned, service_level),
        }
    }

    fn walk(
        &self,
        start: DateTime<Utc>,
        days: u32,
        direction: Direction,
    ) -> Result<DateTime<Utc>, ServiceLevelError> {
        let mut current = start;
        for _ in 0..days {
            current = self.next_working_day(current, direction)?;
        }
        Ok(current)
    }

    fn next_working_day(
        &self,
        from: DateTime<Utc>,
        direction: Direction,
    ) -> Result<DateTime<Utc>, ServiceLevelError> {
        let mut current = from;
        for _ in 0..SEARCH_HORIZON_DAYS {
            current = step(current, direction)?;
            if self.is_working_day(current) {
                return Ok(current);
            }
        }
        Err(ServiceLevelError::NoWorkingDay(from.date_naive()))
    }
}

fn step(instant: DateTime<Utc>, direction: Direction) -> Result<DateTime<Utc>, ServiceLevelError> {
    let one_day = Days::new(1);
    let next = match direction {
        Direction::Forward => instant.checked_add_days(one_day),
        Direction::Backward => instant.checked_sub_days(one_day),
    };
    next.ok_or(ServiceLevelError::OutOfRange(instant))
}
