//! Defines the row types that flow from the precipitation archive into the analysis core.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// A single hourly precipitation reading for one location.
///
/// Timestamps are naive local times in the timezone the series was requested in,
/// so calendar dates and weekdays derived from them match the city's own calendar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyObservation {
    /// Start of the hour this reading covers.
    pub timestamp: NaiveDateTime,
    /// Precipitation during the hour, in millimetres.
    pub precipitation_mm: f64,
}

impl HourlyObservation {
    pub fn new(timestamp: NaiveDateTime, precipitation_mm: f64) -> Self {
        Self {
            timestamp,
            precipitation_mm,
        }
    }

    /// Calendar date of the reading.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Calendar month of the reading, `1..=12`.
    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }
}

/// Whether a calendar date falls on a Saturday or a Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The rain/no-rain label of one calendar date.
///
/// Produced fresh by [`crate::aggregate`] on every analysis; never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DailyLabel {
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub is_rainy_day: bool,
}
