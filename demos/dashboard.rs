//! demos/dashboard.rs
//!
//! Runs a summer-only rainy-day analysis for Limoges and shows the box plot and the
//! overlaid histogram of the bootstrap distributions in the browser.
//!
//! To run this demo:
//! cargo run --example dashboard --features examples

use std::error::Error;

use plotlars::{BoxPlot, Histogram, Plot, Rgb, Text};
use polars::prelude::*;
use rainday::{
    bootstrap_frame, render, AnalysisParams, RainArchive, DAY_TYPE_COLUMN, FREQUENCY_COLUMN,
    WEEKDAY_RGB, WEEKEND_RGB,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let archive = RainArchive::new().await?;

    let analysis = archive
        .analyze_city()
        .city("Limoges")
        .params(
            AnalysisParams::builder()
                .selected_months(vec![6, 7, 8])
                .seed(42)
                .build(),
        )
        .call()
        .await?;

    let (summary, charts) = render(&analysis.result);
    println!("{summary}");

    let frame = bootstrap_frame(&analysis.result)?;
    plot_box(&frame, &charts.box_plot.title);
    plot_histogram(&frame, &charts.histogram.title);
    Ok(())
}

fn colors() -> Vec<Rgb> {
    let rgb = |(r, g, b): (u8, u8, u8)| Rgb(r, g, b);
    vec![rgb(WEEKDAY_RGB), rgb(WEEKEND_RGB)]
}

fn plot_box(data: &DataFrame, title: &str) {
    BoxPlot::builder()
        .data(data)
        .labels(DAY_TYPE_COLUMN)
        .values(FREQUENCY_COLUMN)
        .group(DAY_TYPE_COLUMN)
        .colors(colors())
        .plot_title(Text::from(title).size(18))
        .x_title("Day Type")
        .y_title("Rainy Day Frequency")
        .build()
        .plot();
}

fn plot_histogram(data: &DataFrame, title: &str) {
    Histogram::builder()
        .data(data)
        .x(FREQUENCY_COLUMN)
        .group(DAY_TYPE_COLUMN)
        .opacity(0.6)
        .colors(colors())
        .plot_title(Text::from(title).size(18))
        .x_title("Rainy Day Frequency")
        .y_title("count")
        .build()
        .plot();
}
