//! One request/response pass through the analysis core.

use crate::analysis::aggregate::aggregate;
use crate::analysis::bootstrap::{compare, BootstrapResult, GroupSamples, DEFAULT_ITERATIONS};
use crate::analysis::error::AnalysisError;
use crate::types::observation::HourlyObservation;
use bon::Builder;
use log::info;
use serde::{Deserialize, Serialize};

/// Parameters of a rainy-day analysis.
///
/// # Examples
///
/// ```
/// use rainday::AnalysisParams;
///
/// let params = AnalysisParams::builder()
///     .rain_threshold(0.5)
///     .selected_months(vec![6, 7, 8])
///     .seed(42)
///     .build();
/// assert_eq!(params.min_rainy_hours, 1);
/// assert_eq!(params.iterations, 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Precipitation (mm) an hour must exceed to count as rainy.
    #[builder(default = 0.1)]
    pub rain_threshold: f64,
    /// Rainy hours a date needs to count as a rainy day.
    #[builder(default = 1)]
    pub min_rainy_hours: u32,
    /// Months (`1..=12`) to keep; `None` keeps all.
    pub selected_months: Option<Vec<u32>>,
    /// Bootstrap iterations.
    #[builder(default = DEFAULT_ITERATIONS)]
    pub iterations: usize,
    /// Seed for reproducible resampling.
    pub seed: Option<u64>,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Output of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainDayAnalysis {
    /// Number of calendar dates that survived the month filter.
    pub day_count: usize,
    pub weekday_days: usize,
    pub weekend_days: usize,
    pub result: BootstrapResult,
}

/// Runs [`aggregate`], splits the labels into weekday and weekend groups and runs [`compare`].
///
/// # Errors
///
/// Propagates [`AnalysisError`] from either stage; nothing is returned partially.
pub fn analyze(
    hourly: &[HourlyObservation],
    params: &AnalysisParams,
) -> Result<RainDayAnalysis, AnalysisError> {
    let labels = aggregate(
        hourly,
        params.rain_threshold,
        params.min_rainy_hours,
        params.selected_months.as_deref(),
    )?;
    let groups = GroupSamples::partition(&labels);
    let result = compare(
        &groups.weekday,
        &groups.weekend,
        params.iterations,
        params.seed,
    )?;

    info!(
        "Analysed {} days: weekday frequency {:.3}, weekend frequency {:.3}, p = {:.2e}",
        labels.len(),
        result.point_estimate.weekday,
        result.point_estimate.weekend,
        result.p_value
    );

    Ok(RainDayAnalysis {
        day_count: labels.len(),
        weekday_days: groups.weekday.len(),
        weekend_days: groups.weekend.len(),
        result,
    })
}
