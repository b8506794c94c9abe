//! Chart specifications for the bootstrap distributions, independent of any
//! plotting backend.

use crate::analysis::bootstrap::BootstrapResult;
use polars::prelude::*;
use serde::Serialize;

pub const WEEKDAY_LABEL: &str = "Weekday";
pub const WEEKEND_LABEL: &str = "Weekend";
pub const WEEKDAY_RGB: (u8, u8, u8) = (34, 163, 192);
pub const WEEKEND_RGB: (u8, u8, u8) = (255, 99, 132);

pub const DAY_TYPE_COLUMN: &str = "day_type";
pub const FREQUENCY_COLUMN: &str = "frequency";

const TEMPLATE: &str = "plotly_dark";
const DAY_TYPE_TITLE: &str = "Day Type";
const FREQUENCY_TITLE: &str = "Rainy Day Frequency";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Box,
    Histogram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Overlay,
}

/// One named series with its colour as a CSS `rgb(..)` string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSpec {
    pub name: String,
    pub color: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<BarMode>,
    pub series: Vec<SeriesSpec>,
}

/// The box plot and the overlaid histogram of both bootstrap distributions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpecs {
    pub box_plot: ChartSpec,
    pub histogram: ChartSpec,
}

fn css_rgb((r, g, b): (u8, u8, u8)) -> String {
    format!("rgb({}, {}, {})", r, g, b)
}

fn series(result: &BootstrapResult) -> Vec<SeriesSpec> {
    vec![
        SeriesSpec {
            name: WEEKDAY_LABEL.to_string(),
            color: css_rgb(WEEKDAY_RGB),
            values: result.weekday_frequencies.clone(),
        },
        SeriesSpec {
            name: WEEKEND_LABEL.to_string(),
            color: css_rgb(WEEKEND_RGB),
            values: result.weekend_frequencies.clone(),
        },
    ]
}

impl ChartSpecs {
    pub fn from_result(result: &BootstrapResult) -> Self {
        Self {
            box_plot: ChartSpec {
                kind: ChartKind::Box,
                title: "Frequency of Rainy Days: Weekends vs Weekdays".to_string(),
                x_axis_title: DAY_TYPE_TITLE.to_string(),
                y_axis_title: FREQUENCY_TITLE.to_string(),
                template: TEMPLATE.to_string(),
                barmode: None,
                series: series(result),
            },
            histogram: ChartSpec {
                kind: ChartKind::Histogram,
                title: "Bootstrapped Frequencies of Rainy Days: Weekends vs Weekdays".to_string(),
                x_axis_title: FREQUENCY_TITLE.to_string(),
                y_axis_title: "count".to_string(),
                template: TEMPLATE.to_string(),
                barmode: Some(BarMode::Overlay),
                series: series(result),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Long-format frame of both bootstrap distributions: one row per iteration and
/// group, weekday rows first.
pub fn bootstrap_frame(result: &BootstrapResult) -> PolarsResult<DataFrame> {
    let day_types: Vec<&str> = std::iter::repeat(WEEKDAY_LABEL)
        .take(result.weekday_frequencies.len())
        .chain(std::iter::repeat(WEEKEND_LABEL).take(result.weekend_frequencies.len()))
        .collect();
    let frequencies: Vec<f64> = result
        .weekday_frequencies
        .iter()
        .chain(result.weekend_frequencies.iter())
        .copied()
        .collect();

    df!(
        DAY_TYPE_COLUMN => day_types,
        FREQUENCY_COLUMN => frequencies
    )
}
