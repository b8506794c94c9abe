use std::path::PathBuf;

use clap::Parser;
use rainday::AnalysisParams;

/// Compare how often it rains on weekends and on weekdays.
#[derive(Debug, Parser)]
#[command(name = "rainday", version, about = "Weekend versus weekday rainy-day analysis")]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// City label from the city list (case-insensitive).
    #[arg(long, default_value = "Limoges")]
    pub city: String,

    /// Precipitation (mm) an hour must exceed to count as rainy.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Rainy hours a day needs to count as a rainy day.
    #[arg(long = "min-hours")]
    pub min_hours: Option<u32>,

    /// Months to keep, e.g. `6,7,8`. All months when omitted.
    #[arg(long, value_delimiter = ',')]
    pub months: Option<Vec<u32>>,

    /// Bootstrap iterations.
    #[arg(long)]
    pub iterations: Option<usize>,

    /// RNG seed for reproducible resampling.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Write the chart specifications as JSON to this file.
    #[arg(long)]
    pub charts: Option<PathBuf>,

    /// List the cities that already have cached data and exit.
    #[arg(long)]
    pub list_cached: bool,
}

impl Cli {
    /// Overrides `base` with every parameter given on the command line.
    pub fn analysis_params(&self, base: &AnalysisParams) -> AnalysisParams {
        let mut params = base.clone();
        if let Some(threshold) = self.threshold {
            params.rain_threshold = threshold;
        }
        if let Some(min_hours) = self.min_hours {
            params.min_rainy_hours = min_hours;
        }
        if let Some(months) = &self.months {
            params.selected_months = Some(months.clone());
        }
        if let Some(iterations) = self.iterations {
            params.iterations = iterations;
        }
        if self.seed.is_some() {
            params.seed = self.seed;
        }
        params
    }
}
