//! Turns an hourly precipitation series into one rainy/dry label per calendar date.

use crate::analysis::error::AnalysisError;
use crate::types::observation::{is_weekend, DailyLabel, HourlyObservation};
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

/// Labels every calendar date present in `hourly` as rainy or dry.
///
/// An hour counts as rainy when its precipitation is strictly greater than
/// `rain_threshold`. A date is rainy when at least `min_rainy_hours` of its
/// retained hours are rainy. When `selected_months` is given, only hours whose
/// month is listed are retained; dates left without any retained hour do not
/// appear in the output.
///
/// The input is only read. Labels are returned in ascending date order, one per date.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidParameter`] if `rain_threshold` is negative or
/// not finite, if `min_rainy_hours` is zero, or if `selected_months` contains a
/// value outside `1..=12`.
pub fn aggregate(
    hourly: &[HourlyObservation],
    rain_threshold: f64,
    min_rainy_hours: u32,
    selected_months: Option<&[u32]>,
) -> Result<Vec<DailyLabel>, AnalysisError> {
    if !rain_threshold.is_finite() || rain_threshold < 0.0 {
        return Err(AnalysisError::invalid(
            "rain_threshold",
            format!("must be a finite value >= 0, got {rain_threshold}"),
        ));
    }
    if min_rainy_hours < 1 {
        return Err(AnalysisError::invalid(
            "min_rainy_hours",
            format!("must be >= 1, got {min_rainy_hours}"),
        ));
    }
    if let Some(months) = selected_months {
        if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(AnalysisError::invalid(
                "selected_months",
                format!("months must be in 1..=12, got {bad}"),
            ));
        }
    }

    let mut month_mask = [true; 12];
    if let Some(months) = selected_months {
        month_mask = [false; 12];
        for &m in months {
            month_mask[(m - 1) as usize] = true;
        }
    }

    // date -> number of hours above the threshold
    let mut rainy_hours: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for obs in hourly {
        if !month_mask[(obs.month() - 1) as usize] {
            continue;
        }
        let count = rainy_hours.entry(obs.date()).or_insert(0);
        if obs.precipitation_mm > rain_threshold {
            *count += 1;
        }
    }

    debug!(
        "Aggregated {} hourly observations into {} days (threshold {} mm, min {} h)",
        hourly.len(),
        rainy_hours.len(),
        rain_threshold,
        min_rainy_hours
    );

    Ok(rainy_hours
        .into_iter()
        .map(|(date, count)| DailyLabel {
            date,
            is_weekend: is_weekend(date),
            is_rainy_day: count >= min_rainy_hours,
        })
        .collect())
}
