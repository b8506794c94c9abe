//! The main entry point: resolves cities, serves their cached hourly precipitation and
//! runs rainy-day analyses on it.

use crate::analysis::params::{analyze, AnalysisParams, RainDayAnalysis};
use crate::cities::city_locator::CityLocator;
use crate::config::RainDayConfig;
use crate::error::RainDayError;
use crate::types::city::City;
use crate::types::observation::HourlyObservation;
use crate::types::precipitation_frame::PrecipitationLazyFrame;
use crate::weather_data::frame_fetcher::FrameFetcher;
use bon::bon;
use log::info;
use std::path::PathBuf;

/// Client for the hourly precipitation archive.
///
/// Series are cached as one CSV per city in the data directory and memoised in
/// memory once loaded, so only the first request for a city touches the network.
///
/// # Examples
///
/// ```no_run
/// # use rainday::{RainArchive, RainDayError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), RainDayError> {
/// let archive = RainArchive::new().await?;
/// let hourly = archive.get("Limoges").await?;
/// println!("{} hourly observations", hourly.len());
/// # Ok(())
/// # }
/// ```
pub struct RainArchive {
    fetcher: FrameFetcher,
    city_list: PathBuf,
    default_params: AnalysisParams,
}

#[bon]
impl RainArchive {
    /// Creates a client from an explicit configuration, creating the data directory
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RainDayError::Config`] if no data directory can be resolved and
    /// [`RainDayError::WeatherData`] if it cannot be created.
    pub async fn with_config(config: RainDayConfig) -> Result<Self, RainDayError> {
        let cache_folder = config.resolve_data_dir()?;
        let fetcher = FrameFetcher::new(&cache_folder, config.archive);
        fetcher.loader().ensure_cache_dir().await?;
        info!("Using precipitation cache in {}", cache_folder.display());
        Ok(Self {
            fetcher,
            city_list: config.city_list,
            default_params: config.analysis,
        })
    }

    /// Creates a client caching into `cache_folder`, with every other setting at
    /// its default.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, RainDayError> {
        Self::with_config(RainDayConfig {
            data_dir: Some(cache_folder),
            ..RainDayConfig::default()
        })
        .await
    }

    /// Creates a client from defaults plus the `RAINDAY_DATA_DIR` and
    /// `RAINDAY_CITY_LIST` environment overrides.
    pub async fn new() -> Result<Self, RainDayError> {
        Self::with_config(RainDayConfig::load(None)?).await
    }

    /// Fetches the hourly precipitation frame of a city.
    ///
    /// Tries the in-memory cache, then the CSV cache, and only then looks the
    /// city up in the city list and downloads its series.
    ///
    /// # Errors
    ///
    /// Returns [`RainDayError::CityLookup`] when an uncached city is not in the city
    /// list and [`RainDayError::WeatherData`] for download or cache failures.
    #[builder]
    pub async fn hourly(&self, city: &str) -> Result<PrecipitationLazyFrame, RainDayError> {
        let city_list = self.city_list.clone();
        let frame = self
            .fetcher
            .get_cache_lazyframe(city, move |name| {
                Ok(CityLocator::from_csv(&city_list)?.find(name)?.clone())
            })
            .await?;
        Ok(PrecipitationLazyFrame::new(frame))
    }

    /// The chronologically ordered hourly observations of a city, with gaps left
    /// as absent hours.
    pub async fn get(&self, location_id: &str) -> Result<Vec<HourlyObservation>, RainDayError> {
        Ok(self
            .hourly()
            .city(location_id)
            .call()
            .await?
            .collect_observations()?)
    }

    /// Fetches a city's series and runs [`analyze`] on it. Parameters not given
    /// fall back to the configured analysis defaults.
    ///
    /// ```no_run
    /// # use rainday::{AnalysisParams, RainArchive, RainDayError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), RainDayError> {
    /// let archive = RainArchive::new().await?;
    /// let summer = archive
    ///     .analyze_city()
    ///     .city("Limoges")
    ///     .params(AnalysisParams::builder().selected_months(vec![6, 7, 8]).seed(7).build())
    ///     .call()
    ///     .await?;
    /// println!("p = {:.2e}", summer.result.p_value);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn analyze_city(
        &self,
        city: &str,
        params: Option<AnalysisParams>,
    ) -> Result<RainDayAnalysis, RainDayError> {
        let params = params.unwrap_or_else(|| self.default_params.clone());
        let hourly = self.get(city).await?;
        let hourly_len = hourly.len();
        // Resampling is CPU bound.
        let analysis = tokio::task::spawn_blocking(move || analyze(&hourly, &params))
            .await
            .map_err(crate::weather_data::error::WeatherDataError::from)??;
        info!("Analysed {} hourly observations for {}", hourly_len, city);
        Ok(analysis)
    }

    /// Looks a city up in the configured city list.
    pub fn find_city(&self, name: &str) -> Result<City, RainDayError> {
        Ok(CityLocator::from_csv(&self.city_list)?.find(name)?.clone())
    }

    /// Every city in the configured city list.
    pub fn cities(&self) -> Result<Vec<City>, RainDayError> {
        Ok(CityLocator::from_csv(&self.city_list)?.cities().to_vec())
    }

    /// Title-cased names of the cities that already have a CSV cache.
    pub async fn cached_cities(&self) -> Result<Vec<String>, RainDayError> {
        Ok(self.fetcher.loader().cached_cities().await?)
    }

    pub fn default_params(&self) -> &AnalysisParams {
        &self.default_params
    }
}
