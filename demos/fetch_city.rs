//! demos/fetch_city.rs
//!
//! Downloads (or loads from cache) the hourly precipitation of a city and prints
//! the wettest hours of May 2024.
//!
//! To run this demo:
//! cargo run --example fetch_city -- Brest

use std::error::Error;

use chrono::NaiveDate;
use polars::prelude::*;
use rainday::{RainArchive, DATETIME_COLUMN, PRECIPITATION_COLUMN};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let city = std::env::args().nth(1).unwrap_or_else(|| "Limoges".to_string());
    let archive = RainArchive::new().await?;
    println!("Cities in the list: {}", archive.cities()?.len());

    let may = archive
        .hourly()
        .city(&city)
        .call()
        .await?
        .get_date_range(
            NaiveDate::from_ymd_opt(2024, 5, 1).ok_or("bad date")?,
            NaiveDate::from_ymd_opt(2024, 5, 15).ok_or("bad date")?,
        );

    let wettest = may
        .filter(col(PRECIPITATION_COLUMN).gt(lit(0.0)))
        .frame
        .sort([PRECIPITATION_COLUMN], SortMultipleOptions::default().with_order_descending(true))
        .select([col(DATETIME_COLUMN), col(PRECIPITATION_COLUMN)])
        .limit(10)
        .collect()?;
    println!("Wettest hours in {city}, May 2024:\n{wettest}");

    println!("Cached cities: {:?}", archive.cached_cities().await?);
    Ok(())
}
