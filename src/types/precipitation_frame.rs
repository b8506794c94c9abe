//! Contains the `PrecipitationLazyFrame` structure for lazy operations on an hourly precipitation series.

use crate::types::observation::HourlyObservation;
use crate::weather_data::error::WeatherDataError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::warn;
use polars::prelude::{col, lit, Expr, LazyFrame, TimeUnit};

/// Column holding the naive local start of each hour.
pub const DATETIME_COLUMN: &str = "datetime";
/// Column holding the hourly precipitation in millimetres.
pub const PRECIPITATION_COLUMN: &str = "precipitation";

/// A wrapper around a Polars `LazyFrame` holding one city's hourly precipitation.
///
/// The frame has a `datetime` column (`Datetime(Milliseconds)`, naive local time of
/// the city) and a `precipitation` column (`Float64`, nullable). Instances are
/// obtained via [`crate::RainArchive::hourly`].
#[derive(Clone)]
pub struct PrecipitationLazyFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
}

fn to_naive(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value).map(|d| d.naive_utc()),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value).map(|d| d.naive_utc()),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value).naive_utc()),
    }
}

impl PrecipitationLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Filters the series based on a Polars predicate expression.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use rainday::{RainArchive, RainDayError};
    /// use polars::prelude::{col, lit};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let archive = RainArchive::new().await?;
    /// let wet_hours = archive
    ///     .hourly()
    ///     .city("Limoges")
    ///     .call()
    ///     .await?
    ///     .filter(col("precipitation").gt(lit(1.0f64)));
    /// println!("{}", wet_hours.frame.collect()?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> PrecipitationLazyFrame {
        PrecipitationLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps hours whose timestamp lies within `start..=end`.
    pub fn get_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> PrecipitationLazyFrame {
        self.filter(
            col(DATETIME_COLUMN)
                .gt_eq(lit(start))
                .and(col(DATETIME_COLUMN).lt_eq(lit(end))),
        )
    }

    /// Keeps hours falling on the dates `start..=end`.
    pub fn get_date_range(&self, start: NaiveDate, end: NaiveDate) -> PrecipitationLazyFrame {
        let first = start.and_time(chrono::NaiveTime::MIN);
        let last = end
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| end.and_time(chrono::NaiveTime::MIN));
        self.get_range(first, last)
    }

    /// Collects the frame into chronologically ordered observations.
    ///
    /// Rows with a missing timestamp or missing precipitation are skipped: gaps in
    /// the upstream series simply become absent hours.
    pub fn collect_observations(&self) -> Result<Vec<HourlyObservation>, WeatherDataError> {
        let df = self
            .frame
            .clone()
            .select([col(DATETIME_COLUMN), col(PRECIPITATION_COLUMN)])
            .collect()?;

        let datetimes = df
            .column(DATETIME_COLUMN)
            .map_err(|e| WeatherDataError::ColumnNotFound(DATETIME_COLUMN.to_string(), e))?
            .datetime()?;
        let unit = datetimes.time_unit();
        let precipitation = df
            .column(PRECIPITATION_COLUMN)
            .map_err(|e| WeatherDataError::ColumnNotFound(PRECIPITATION_COLUMN.to_string(), e))?
            .f64()?;

        let mut skipped = 0usize;
        let mut observations: Vec<HourlyObservation> = datetimes
            .into_iter()
            .zip(precipitation.into_iter())
            .filter_map(|(ts, mm)| {
                let observation = ts
                    .and_then(|v| to_naive(v, unit))
                    .zip(mm)
                    .map(|(ts, mm)| HourlyObservation::new(ts, mm));
                if observation.is_none() {
                    skipped += 1;
                }
                observation
            })
            .collect();

        if skipped > 0 {
            warn!("Skipped {} hours with missing timestamp or precipitation", skipped);
        }
        observations.sort_by_key(|o| o.timestamp);
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn ts(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample_frame() -> PrecipitationLazyFrame {
        let stamps = vec![ts(2, 1), ts(1, 0), ts(1, 1), ts(3, 5)];
        let datetime = DatetimeChunked::from_naive_datetime(
            DATETIME_COLUMN.into(),
            stamps,
            TimeUnit::Milliseconds,
        )
        .into_series();
        let precipitation = Series::new(
            PRECIPITATION_COLUMN.into(),
            &[Some(0.4f64), Some(0.0), None, Some(2.5)],
        );
        let df = DataFrame::new(vec![datetime.into(), precipitation.into()]).unwrap();
        PrecipitationLazyFrame::new(df.lazy())
    }

    #[test]
    fn test_collect_skips_nulls_and_sorts() {
        let obs = sample_frame().collect_observations().unwrap();
        assert_eq!(
            obs,
            vec![
                HourlyObservation::new(ts(1, 0), 0.0),
                HourlyObservation::new(ts(2, 1), 0.4),
                HourlyObservation::new(ts(3, 5), 2.5),
            ]
        );
    }

    #[test]
    fn test_get_range_is_inclusive() {
        let obs = sample_frame()
            .get_range(ts(1, 0), ts(2, 1))
            .collect_observations()
            .unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[1].timestamp, ts(2, 1));
    }

    #[test]
    fn test_get_date_range() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let obs = sample_frame()
            .get_date_range(day, day)
            .collect_observations()
            .unwrap();
        assert_eq!(obs, vec![HourlyObservation::new(ts(3, 5), 2.5)]);
    }

    #[test]
    fn test_filter_expression() {
        let obs = sample_frame()
            .filter(col(PRECIPITATION_COLUMN).gt(lit(0.1f64)))
            .collect_observations()
            .unwrap();
        assert_eq!(obs.len(), 2);
    }
}
