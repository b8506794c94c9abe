//! Bootstrap comparison of weekday and weekend rainy-day frequencies.

use crate::analysis::error::AnalysisError;
use crate::analysis::welch::welch_t_test;
use crate::types::observation::DailyLabel;
use log::debug;
use rand::rngs::StdRng;
use rand::distr::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Default number of bootstrap iterations.
pub const DEFAULT_ITERATIONS: usize = 10_000;

/// The rainy/dry labels of one day group, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSamples {
    pub weekday: Vec<bool>,
    pub weekend: Vec<bool>,
}

impl GroupSamples {
    /// Splits daily labels on their weekend flag. Every label lands in exactly one group.
    pub fn partition(labels: &[DailyLabel]) -> Self {
        let (weekend, weekday): (Vec<&DailyLabel>, Vec<&DailyLabel>) =
            labels.iter().partition(|l| l.is_weekend);
        Self {
            weekday: weekday.into_iter().map(|l| l.is_rainy_day).collect(),
            weekend: weekend.into_iter().map(|l| l.is_rainy_day).collect(),
        }
    }
}

/// Rainy-day frequency of each group over the full, unsampled labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointEstimate {
    pub weekday: f64,
    pub weekend: f64,
}

/// Result of one [`compare`] call. Owned by the caller; nothing is cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapResult {
    /// Mean of each weekday resample, one per iteration.
    pub weekday_frequencies: Vec<f64>,
    /// Mean of each weekend resample, one per iteration.
    pub weekend_frequencies: Vec<f64>,
    pub point_estimate: PointEstimate,
    /// Welch statistic of `weekend_frequencies` against `weekday_frequencies`.
    pub t_statistic: f64,
    /// Two-sided p-value of the Welch test.
    pub p_value: f64,
}

fn fraction_true(labels: &[bool]) -> f64 {
    labels.iter().filter(|&&b| b).count() as f64 / labels.len() as f64
}

/// Uniform index distribution over one group, built once per [`compare`] call.
fn index_distribution(len: usize) -> Result<Uniform<usize>, AnalysisError> {
    Uniform::new(0, len).map_err(|e| AnalysisError::invalid("labels", e.to_string()))
}

/// Draws a batch of `n` indices with replacement from `source` and returns the share of `true`s.
fn resample_mean(
    source: &[u32],
    n: usize,
    indices: &Uniform<usize>,
    rng: &mut impl Rng,
) -> f64 {
    let hits: u64 = indices
        .sample_iter(&mut *rng)
        .take(n)
        .map(|i| u64::from(source[i]))
        .sum();
    hits as f64 / n as f64
}

/// Estimates the sampling distribution of each group's rainy-day frequency and
/// tests whether weekends and weekdays differ.
///
/// Each of the `iterations` rounds draws `n = min(len(weekday), len(weekend))`
/// labels with replacement from each group and records the resample means. The
/// two series of means are then compared with Welch's t-test (weekend minus
/// weekday). Point estimates are computed over the full, unsampled inputs.
///
/// With `seed` set the draws come from `StdRng::seed_from_u64(seed)` and are
/// bit-for-bit reproducible for the same inputs and iteration count; without a
/// seed the generator is seeded from the operating system.
///
/// # Errors
///
/// * [`AnalysisError::InsufficientData`] if either group is empty.
/// * [`AnalysisError::InvalidParameter`] if `iterations < 2`; the Welch test needs
///   at least two bootstrap means per group to estimate a variance.
pub fn compare(
    weekday_labels: &[bool],
    weekend_labels: &[bool],
    iterations: usize,
    seed: Option<u64>,
) -> Result<BootstrapResult, AnalysisError> {
    if weekday_labels.is_empty() {
        return Err(AnalysisError::InsufficientData { group: "weekday" });
    }
    if weekend_labels.is_empty() {
        return Err(AnalysisError::InsufficientData { group: "weekend" });
    }
    if iterations < 2 {
        return Err(AnalysisError::invalid(
            "iterations",
            format!("must be >= 2, got {iterations}"),
        ));
    }

    let n = weekday_labels.len().min(weekend_labels.len());
    let point_estimate = PointEstimate {
        weekday: fraction_true(weekday_labels),
        weekend: fraction_true(weekend_labels),
    };

    let weekday: Vec<u32> = weekday_labels.iter().map(|&b| u32::from(b)).collect();
    let weekend: Vec<u32> = weekend_labels.iter().map(|&b| u32::from(b)).collect();

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    debug!(
        "Bootstrapping {} iterations of {} draws ({} weekdays, {} weekend days)",
        iterations,
        n,
        weekday.len(),
        weekend.len()
    );

    let weekday_indices = index_distribution(weekday.len())?;
    let weekend_indices = index_distribution(weekend.len())?;
    let mut weekday_frequencies = Vec::with_capacity(iterations);
    let mut weekend_frequencies = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        weekday_frequencies.push(resample_mean(&weekday, n, &weekday_indices, &mut rng));
        weekend_frequencies.push(resample_mean(&weekend, n, &weekend_indices, &mut rng));
    }

    let test = welch_t_test(&weekend_frequencies, &weekday_frequencies)?;

    Ok(BootstrapResult {
        weekday_frequencies,
        weekend_frequencies,
        point_estimate,
        t_statistic: test.t_statistic,
        p_value: test.p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn labels(pattern: &[u8]) -> Vec<bool> {
        pattern.iter().map(|&b| b == 1).collect()
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let days: Vec<DailyLabel> = (0..30)
            .map(|i| {
                let date = start + chrono::Duration::days(i);
                DailyLabel {
                    date,
                    is_weekend: crate::types::observation::is_weekend(date),
                    is_rainy_day: i % 3 == 0,
                }
            })
            .collect();
        let groups = GroupSamples::partition(&days);
        assert_eq!(groups.weekday.len() + groups.weekend.len(), days.len());
        assert_eq!(
            groups.weekend.len(),
            days.iter().filter(|d| d.is_weekend).count()
        );
    }

    #[test]
    fn test_point_estimate_is_exact_fraction() {
        let r = compare(&labels(&[1, 0, 1, 1]), &labels(&[0, 1]), 50, Some(1)).unwrap();
        assert_eq!(r.point_estimate.weekday, 0.75);
        assert_eq!(r.point_estimate.weekend, 0.5);
    }

    #[test]
    fn test_reproducible_with_seed() {
        let wd = labels(&[1, 0, 0, 1, 0, 1, 1, 0, 0, 0]);
        let we = labels(&[1, 1, 0, 1]);
        let a = compare(&wd, &we, 500, Some(42)).unwrap();
        let b = compare(&wd, &we, 500, Some(42)).unwrap();
        assert_eq!(a.weekday_frequencies, b.weekday_frequencies);
        assert_eq!(a.weekend_frequencies, b.weekend_frequencies);
        assert_eq!(a.t_statistic.to_bits(), b.t_statistic.to_bits());

        let c = compare(&wd, &we, 500, Some(43)).unwrap();
        assert_ne!(a.weekday_frequencies, c.weekday_frequencies);
    }

    #[test]
    fn test_sample_size_and_range() {
        let wd = labels(&[1, 0, 0, 1, 0, 1, 1, 0, 0, 0, 1]);
        let we = labels(&[1, 1, 0]);
        let r = compare(&wd, &we, 1_000, None).unwrap();
        assert_eq!(r.weekday_frequencies.len(), 1_000);
        assert_eq!(r.weekend_frequencies.len(), 1_000);
        assert!(r
            .weekday_frequencies
            .iter()
            .chain(r.weekend_frequencies.iter())
            .all(|f| (0.0..=1.0).contains(f)));
        // n = 3 draws per resample, so every mean is a multiple of 1/3.
        assert!(r
            .weekday_frequencies
            .iter()
            .all(|f| ((f * 3.0).round() - f * 3.0).abs() < 1e-9));
    }

    #[test]
    fn test_constant_groups() {
        let r = compare(&[true; 8], &[false; 5], 100, Some(7)).unwrap();
        assert!(r.weekday_frequencies.iter().all(|&f| f == 1.0));
        assert!(r.weekend_frequencies.iter().all(|&f| f == 0.0));
        assert_eq!(r.t_statistic, f64::NEG_INFINITY);
        assert_eq!(r.p_value, 0.0);
        assert!(!r.p_value.is_nan());
    }

    #[test]
    fn test_clear_difference_is_significant() {
        let wd: Vec<bool> = (0..200).map(|i| i % 5 == 0).collect(); // 20 %
        let we: Vec<bool> = (0..80).map(|i| i % 5 != 0).collect(); // 80 %
        let r = compare(&wd, &we, 2_000, Some(3)).unwrap();
        assert!(r.t_statistic > 0.0);
        assert!(r.p_value < 1e-6);
    }

    #[test]
    fn test_swapping_series_negates_t() {
        let a = labels(&[1, 0, 0, 1, 0, 1, 1, 0, 0, 0, 1, 0]);
        let b = labels(&[1, 1, 0, 1, 0, 1]);
        let r = compare(&a, &b, 300, Some(11)).unwrap();
        let swapped = welch_t_test(&r.weekday_frequencies, &r.weekend_frequencies).unwrap();
        assert_eq!(r.t_statistic, -swapped.t_statistic);
        assert_eq!(r.p_value, swapped.p_value);
    }

    #[test]
    fn test_empty_groups_are_insufficient() {
        assert_eq!(
            compare(&[], &[true], 10, None),
            Err(AnalysisError::InsufficientData { group: "weekday" })
        );
        assert_eq!(
            compare(&[true], &[], 10, None),
            Err(AnalysisError::InsufficientData { group: "weekend" })
        );
    }

    #[test]
    fn test_draws_follow_weekday_then_weekend_batches() {
        let wd = labels(&[1, 0, 0, 1, 0, 1, 1]);
        let we = labels(&[0, 1, 1]);
        let r = compare(&wd, &we, 20, Some(99)).unwrap();

        // One batch of n = 3 weekday indices, then one of weekend indices, per iteration.
        let mut rng = StdRng::seed_from_u64(99);
        let wd_idx = Uniform::new(0, wd.len()).unwrap();
        let we_idx = Uniform::new(0, we.len()).unwrap();
        for i in 0..20 {
            let wd_hits = (0..3).filter(|_| wd[wd_idx.sample(&mut rng)]).count();
            let we_hits = (0..3).filter(|_| we[we_idx.sample(&mut rng)]).count();
            assert_eq!(r.weekday_frequencies[i], wd_hits as f64 / 3.0);
            assert_eq!(r.weekend_frequencies[i], we_hits as f64 / 3.0);
        }
    }

    #[test]
    fn test_invalid_iterations() {
        assert!(matches!(
            compare(&[true], &[false], 0, None),
            Err(AnalysisError::InvalidParameter { name: "iterations", .. })
        ));
        assert!(matches!(
            compare(&[true], &[false], 1, None),
            Err(AnalysisError::InvalidParameter { name: "iterations", .. })
        ));
    }
}
