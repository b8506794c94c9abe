use crate::analysis::bootstrap::BootstrapResult;
use serde::Serialize;
use std::fmt;

/// The four headline figures of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryView {
    pub weekday_frequency: f64,
    pub weekend_frequency: f64,
    pub t_statistic: f64,
    pub p_value: f64,
}

impl SummaryView {
    pub fn from_result(result: &BootstrapResult) -> Self {
        Self {
            weekday_frequency: result.point_estimate.weekday,
            weekend_frequency: result.point_estimate.weekend,
            t_statistic: result.t_statistic,
            p_value: result.p_value,
        }
    }

    /// One display line per figure, in dashboard order.
    pub fn lines(&self) -> [String; 4] {
        [
            format!("Weekday Rainy Day Frequency: {:.2}", self.weekday_frequency),
            format!("Weekend Rainy Day Frequency: {:.2}", self.weekend_frequency),
            format!("T-statistic: {:.2}", self.t_statistic),
            format!("P-value: {}", scientific(self.p_value)),
        ]
    }
}

impl fmt::Display for SummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

/// Two-decimal scientific notation with a signed, zero-padded exponent (`1.23e-05`).
fn scientific(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.2e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scientific_notation() {
        assert_eq!(scientific(0.0000123), "1.23e-05");
        assert_eq!(scientific(0.08052), "8.05e-02");
        assert_eq!(scientific(1.0), "1.00e+00");
        assert_eq!(scientific(0.0), "0.00e+00");
        assert_eq!(scientific(3.2e-120), "3.20e-120");
    }

    #[test]
    fn test_display_lines() {
        let view = SummaryView {
            weekday_frequency: 0.4567,
            weekend_frequency: 0.5,
            t_statistic: -12.346,
            p_value: 0.00042,
        };
        assert_eq!(
            view.to_string(),
            "Weekday Rainy Day Frequency: 0.46\n\
             Weekend Rainy Day Frequency: 0.50\n\
             T-statistic: -12.35\n\
             P-value: 4.20e-04"
        );
    }
}
