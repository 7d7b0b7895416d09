//! Service-level durations expressed in ISO-8601 notation.

use super::ServiceLevelError;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Working-time budget attached to a classification.
///
/// The duration is parsed from ISO-8601 notation (`P13D`, `P2W`, `PT36H`)
/// and is interpreted in whole working days: a budget of 36 hours is one
/// working day. The lenient form `P24H` (hours without the `T` designator)
/// is accepted. Years and months are rejected because their length in days
/// is ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceLevel(TimeDelta);

impl ServiceLevel {
    /// A service level of zero working days.
    #[must_use]
    pub const fn zero() -> Self {
        Self(TimeDelta::zero())
    }

    /// Creates a service level spanning the given number of working days.
    #[must_use]
    pub fn from_working_days(days: u32) -> Self {
        Self(TimeDelta::try_days(i64::from(days)).unwrap_or(TimeDelta::MAX))
    }

    /// Parses an ISO-8601 duration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceLevelError::InvalidDuration`] when the text is not a
    /// supported duration.
    pub fn parse(text: &str) -> Result<Self, ServiceLevelError> {
        let invalid = || ServiceLevelError::InvalidDuration(text.to_owned());
        let trimmed = text.trim();
        let body = trimmed
            .strip_prefix('P')
            .or_else(|| trimmed.strip_prefix('p'))
            .ok_or_else(invalid)?;

        let mut total = TimeDelta::zero();
        let mut digits = String::new();
        let mut in_time_part = false;
        let mut has_component = false;
        let mut has_time_component = false;

        for ch in body.chars() {
            match ch.to_ascii_uppercase() {
                digit @ '0'..='9' => digits.push(digit),
                'T' if !in_time_part && digits.is_empty() => in_time_part = true,
                unit => {
                    let amount: i64 = digits.parse().map_err(|_| invalid())?;
                    digits.clear();
                    let component = component(unit, amount, in_time_part).ok_or_else(invalid)?;
                    total = total.checked_add(&component).ok_or_else(invalid)?;
                    has_component = true;
                    has_time_component = in_time_part;
                }
            }
        }

        if !digits.is_empty() || !has_component || (in_time_part && !has_time_component) {
            return Err(invalid());
        }
        Ok(Self(total))
    }

    /// Returns the raw duration.
    #[must_use]
    pub const fn duration(self) -> TimeDelta {
        self.0
    }

    /// Returns the number of whole working days in the budget.
    #[must_use]
    pub fn working_days(self) -> u32 {
        u32::try_from(self.0.num_days()).unwrap_or(u32::MAX)
    }
}

fn component(unit: char, amount: i64, in_time_part: bool) -> Option<TimeDelta> {
    match (unit, in_time_part) {
        ('W', false) => TimeDelta::try_weeks(amount),
        ('D', false) => TimeDelta::try_days(amount),
        ('H', _) => TimeDelta::try_hours(amount),
        ('M', true) => TimeDelta::try_minutes(amount),
        ('S', _) => TimeDelta::try_seconds(amount),
        _ => None,
    }
}

impl Default for ServiceLevel {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for ServiceLevel {
    type Err = ServiceLevelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ServiceLevel {
    type Error = ServiceLevelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ServiceLevel> for String {
    fn from(value: ServiceLevel) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.0.num_days();
        let rest = self.0 - TimeDelta::try_days(days).unwrap_or_default();
        let hours = rest.num_hours();
        let minutes = rest.num_minutes() - hours * 60;
        let seconds = rest.num_seconds() - rest.num_minutes() * 60;

        write!(f, "P")?;
        if days != 0 || rest.is_zero() {
            write!(f, "{days}D")?;
        }
        if rest.is_zero() {
            return Ok(());
        }
        write!(f, "T")?;
        if hours != 0 {
            write!(f, "{hours}H")?;
        }
        if minutes != 0 {
            write!(f, "{minutes}M")?;
        }
        if seconds != 0 {
            write!(f, "{seconds}S")?;
        }
        Ok(())
    }
}
