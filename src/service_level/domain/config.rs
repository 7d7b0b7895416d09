//! Configuration describing which calendar days count as working days.

use super::ServiceLevelError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A holiday recurring on the same day of the same month every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomHoliday {
    /// Day of month, starting at 1.
    pub day: u32,
    /// Month of year, starting at 1.
    pub month: u32,
}

impl CustomHoliday {
    /// Creates a recurring holiday.
    #[must_use]
    pub const fn new(day: u32, month: u32) -> Self {
        Self { day, month }
    }

    /// Returns `true` when the holiday falls on `date`.
    #[must_use]
    pub fn matches(self, date: NaiveDate) -> bool {
        date.day() == self.day && date.month() == self.month
    }
}

/// Working-time configuration loaded by the embedding application.
///
/// Unset fields fall back to [`WorkingTimeConfig::default`]: Saturday and
/// Sunday are weekend days and no holidays are configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkingTimeConfig {
    /// Days of the week that are never working days.
    pub weekend_days: Vec<Weekday>,
    /// Holidays recurring every year.
    pub custom_holidays: Vec<CustomHoliday>,
    /// Individual non-working dates.
    pub holidays: Vec<NaiveDate>,
    /// Whether German nationwide public holidays are observed.
    pub german_public_holidays_enabled: bool,
    /// Whether Corpus Christi is observed in addition to the German
    /// nationwide holidays.
    pub corpus_christi_enabled: bool,
}

impl Default for WorkingTimeConfig {
    fn default() -> Self {
        Self {
            weekend_days: vec![Weekday::Sat, Weekday::Sun],
            custom_holidays: Vec::new(),
            holidays: Vec::new(),
            german_public_holidays_enabled: false,
            corpus_christi_enabled: false,
        }
    }
}

impl WorkingTimeConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceLevelError::InvalidConfig`] when the document is not
    /// valid JSON or carries unknown fields.
    pub fn from_json(document: &str) -> Result<Self, ServiceLevelError> {
        serde_json::from_str(document)
            .map_err(|err| ServiceLevelError::InvalidConfig(err.to_string()))
    }

    /// Enables German public holidays.
    #[must_use]
    pub fn with_german_public_holidays(mut self, corpus_christi: bool) -> Self {
        self.german_public_holidays_enabled = true;
        self.corpus_christi_enabled = corpus_christi;
        self
    }

    /// Adds a recurring holiday.
    #[must_use]
    pub fn with_custom_holiday(mut self, holiday: CustomHoliday) -> Self {
        self.custom_holidays.push(holiday);
        self
    }

    /// Adds a one-off holiday.
    #[must_use]
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.push(date);
        self
    }

    /// Checks the configuration for values that can never be satisfied.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceLevelError::InvalidConfig`] when every weekday is a
    /// weekend day or a custom holiday names an impossible date.
    pub fn validate(&self) -> Result<(), ServiceLevelError> {
        let all_weekend = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .iter()
        .all(|day| self.weekend_days.contains(day));
        if all_weekend {
            return Err(ServiceLevelError::InvalidConfig(
                "every day of the week is configured as weekend".to_owned(),
            ));
        }

        // 2000 is a leap year, so 29 February passes.
        if let Some(holiday) = self
            .custom_holidays
            .iter()
            .find(|holiday| NaiveDate::from_ymd_opt(2000, holiday.month, holiday.day).is_none())
        {
            return Err(ServiceLevelError::InvalidConfig(format!(
                "custom holiday {}.{} is not a calendar date",
                holiday.day, holiday.month
            )));
        }
        Ok(())
    }
}
