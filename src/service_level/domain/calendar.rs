//! Working-day calendars.

use super::{CustomHoliday, ServiceLevelError, WorkingTimeConfig};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Decides whether a calendar day counts towards a service level.
pub trait WorkingTimeCalendar: Send + Sync {
    /// Returns `true` when `date` is neither a weekend day nor a holiday.
    fn is_working_day(&self, date: NaiveDate) -> bool;
}

/// Fixed-date German nationwide holidays as `(day, month)`.
const GERMAN_FIXED_HOLIDAYS: [CustomHoliday; 5] = [
    CustomHoliday::new(1, 1),
    CustomHoliday::new(1, 5),
    CustomHoliday::new(3, 10),
    CustomHoliday::new(25, 12),
    CustomHoliday::new(26, 12),
];

/// Offsets from Easter Sunday: Good Friday, Easter Monday, Ascension Day and
/// Whit Monday.
const GERMAN_EASTER_OFFSETS: [i64; 4] = [-2, 1, 39, 50];

const CORPUS_CHRISTI_OFFSET: i64 = 60;

/// Calendar built from a [`WorkingTimeConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredCalendar {
    weekend_days: Vec<Weekday>,
    custom_holidays: Vec<CustomHoliday>,
    holidays: BTreeSet<NaiveDate>,
    german_public_holidays: bool,
    corpus_christi: bool,
}

impl ConfiguredCalendar {
    /// Builds a calendar from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceLevelError::InvalidConfig`] when the configuration
    /// fails [`WorkingTimeConfig::validate`].
    pub fn from_config(config: &WorkingTimeConfig) -> Result<Self, ServiceLevelError> {
        config.validate()?;
        Ok(Self {
            weekend_days: config.weekend_days.clone(),
            custom_holidays: config.custom_holidays.clone(),
            holidays: config.holidays.iter().copied().collect(),
            german_public_holidays: config.german_public_holidays_enabled,
            corpus_christi: config.corpus_christi_enabled,
        })
    }

    /// Returns `true` when `date` is a configured or public holiday.
    #[must_use]
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
            || self.custom_holidays.iter().any(|holiday| holiday.matches(date))
            || (self.german_public_holidays && self.is_german_holiday(date))
    }

    fn is_german_holiday(&self, date: NaiveDate) -> bool {
        if GERMAN_FIXED_HOLIDAYS.iter().any(|holiday| holiday.matches(date)) {
            return true;
        }
        let Some(easter) = easter_sunday(date.year()) else {
            return false;
        };
        let offset = date.signed_duration_since(easter).num_days();
        GERMAN_EASTER_OFFSETS.contains(&offset)
            || (self.corpus_christi && offset == CORPUS_CHRISTI_OFFSET)
    }
}

impl Default for ConfiguredCalendar {
    fn default() -> Self {
        Self {
            weekend_days: vec![Weekday::Sat, Weekday::Sun],
            custom_holidays: Vec::new(),
            holidays: BTreeSet::new(),
            german_public_holidays: false,
            corpus_christi: false,
        }
    }
}

impl WorkingTimeCalendar for ConfiguredCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.weekend_days.contains(&date.weekday()) && !self.is_holiday(date)
    }
}

/// Computes Easter Sunday of the Gregorian calendar for `year`.
///
/// Uses the anonymous Gregorian algorithm (Meeus/Jones/Butcher). Returns
/// `None` only when the year is outside the range `chrono` can represent.
#[must_use]
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let month = (h + l - 7 * m + 114).div_euclid(31);
    let day = (h + l - 7 * m + 114).rem_euclid(31) + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}
