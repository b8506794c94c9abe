//! Welch's unequal-variance two-sample t-test.

use crate::analysis::error::AnalysisError;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Outcome of [`welch_t_test`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WelchTest {
    /// Difference of means `mean(a) - mean(b)` over its standard error.
    pub t_statistic: f64,
    /// Two-sided p-value under Student's t with `degrees_of_freedom`.
    pub p_value: f64,
    /// Welch–Satterthwaite effective degrees of freedom.
    pub degrees_of_freedom: f64,
}

/// Arithmetic mean and sample variance (N-1 denominator).
pub(crate) fn mean_and_variance(data: &[f64]) -> (f64, f64) {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let ss = data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>();
    (mean, ss / (n - 1.0))
}

/// Tests whether `a` and `b` have different means without assuming equal variances.
///
/// Both samples need at least two values. When both samples have zero variance the
/// statistic is undefined; the test then reports `t = 0, p = 1` for equal means and
/// `t = ±inf, p = 0` otherwise.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidParameter`] if either sample has fewer than two values.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Result<WelchTest, AnalysisError> {
    if a.len() < 2 || b.len() < 2 {
        return Err(AnalysisError::invalid(
            "samples",
            format!(
                "Welch's test needs >= 2 values per sample, got {} and {}",
                a.len(),
                b.len()
            ),
        ));
    }

    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (mean_a, var_a) = mean_and_variance(a);
    let (mean_b, var_b) = mean_and_variance(b);
    let se_a = var_a / na;
    let se_b = var_b / nb;
    let se_sum = se_a + se_b;
    let diff = mean_a - mean_b;

    if se_sum <= 0.0 {
        let (t_statistic, p_value) = if diff == 0.0 {
            (0.0, 1.0)
        } else {
            (diff.signum() * f64::INFINITY, 0.0)
        };
        return Ok(WelchTest {
            t_statistic,
            p_value,
            degrees_of_freedom: na + nb - 2.0,
        });
    }

    let t_statistic = diff / se_sum.sqrt();
    let degrees_of_freedom =
        se_sum * se_sum / (se_a * se_a / (na - 1.0) + se_b * se_b / (nb - 1.0));

    let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).map_err(|e| {
        AnalysisError::invalid("degrees_of_freedom", format!("{degrees_of_freedom}: {e}"))
    })?;
    let p_value = (2.0 * dist.sf(t_statistic.abs())).min(1.0);

    Ok(WelchTest {
        t_statistic,
        p_value,
        degrees_of_freedom,
    })
}
