mod cli;
mod logging;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rainday::{render, RainArchive, RainDayConfig};

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = RainDayConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let archive = RainArchive::with_config(config).await?;

    if cli.list_cached {
        for city in archive.cached_cities().await? {
            println!("{city}");
        }
        return Ok(());
    }

    let params = cli.analysis_params(archive.default_params());
    let analysis = archive
        .analyze_city()
        .city(&cli.city)
        .params(params)
        .call()
        .await
        .with_context(|| format!("analysing rainy days for {}", cli.city))?;
    info!(
        "{} days analysed ({} weekday, {} weekend)",
        analysis.day_count, analysis.weekday_days, analysis.weekend_days
    );

    let (summary, charts) = render(&analysis.result);
    println!("{summary}");

    if let Some(path) = &cli.charts {
        std::fs::write(path, charts.to_json()?)
            .with_context(|| format!("writing charts to {}", path.display()))?;
        info!("Wrote chart specifications to {}", path.display());
    }
    Ok(())
}
