use crate::config::ArchiveConfig;
use crate::error::RainDayError;
use crate::types::city::City;
use crate::weather_data::data_loader::WeatherDataLoader;
use log::debug;
use polars::prelude::LazyFrame;
use std::collections::{hash_map::Entry, HashMap};
use std::path::Path;
use tokio::sync::Mutex;

/// Serves per-city precipitation frames, from memory, the CSV cache, or the archive
/// in that order.
pub struct FrameFetcher {
    loader: WeatherDataLoader,
    lazyframe_cache: Mutex<HashMap<String, LazyFrame>>,
}

impl FrameFetcher {
    pub fn new(cache_dir: &Path, archive: ArchiveConfig) -> Self {
        Self {
            loader: WeatherDataLoader::new(cache_dir, archive),
            lazyframe_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn loader(&self) -> &WeatherDataLoader {
        &self.loader
    }

    /// Gets the frame for `city_name`. `locate` is only called on a full cache miss,
    /// when coordinates are needed for the download.
    pub async fn get_cache_lazyframe<F>(
        &self,
        city_name: &str,
        locate: F,
    ) -> Result<LazyFrame, RainDayError>
    where
        F: FnOnce(&str) -> Result<City, RainDayError>,
    {
        let key = City::cache_key(city_name);

        {
            let cache = self.lazyframe_cache.lock().await;
            if let Some(frame) = cache.get(&key) {
                debug!("In-memory frame hit for {}", key);
                return Ok(frame.clone());
            }
        }

        // Load outside the lock; the download can take a while.
        let loaded_frame = if self.loader.is_cached(city_name).await {
            self.loader.scan_cached(city_name)?
        } else {
            let city = locate(city_name)?;
            self.loader.download_and_cache(&city).await?
        };

        let mut cache = self.lazyframe_cache.lock().await;
        match cache.entry(key) {
            // Another task loaded it first; keep theirs.
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                entry.insert(loaded_frame.clone());
                Ok(loaded_frame)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::error::CityLookupError;
    use std::io::Write;

    fn write_cache(dir: &Path, file: &str) {
        let mut f = std::fs::File::create(dir.join(file)).unwrap();
        writeln!(f, "datetime,precipitation").unwrap();
        writeln!(f, "2024-05-11T00:00:00.000,0.3").unwrap();
        writeln!(f, "2024-05-11T01:00:00.000,0.0").unwrap();
    }

    fn never_locate(name: &str) -> Result<City, RainDayError> {
        Err(CityLookupError::LocationNotFound {
            city: name.to_string(),
        }
        .into())
    }

    #[tokio::test]
    async fn test_cached_city_does_not_need_location() {
        let dir = tempfile::tempdir().unwrap();
        write_cache(dir.path(), "saint_malo_weather_data.csv");
        let fetcher = FrameFetcher::new(dir.path(), ArchiveConfig::default());

        let frame = fetcher
            .get_cache_lazyframe("Saint Malo", never_locate)
            .await
            .unwrap();
        assert_eq!(frame.collect().unwrap().height(), 2);

        // Memory hit after the file is gone, keyed case-insensitively.
        std::fs::remove_file(dir.path().join("saint_malo_weather_data.csv")).unwrap();
        assert!(fetcher
            .get_cache_lazyframe("SAINT MALO", never_locate)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_unknown_uncached_city_fails_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FrameFetcher::new(dir.path(), ArchiveConfig::default());
        let result = fetcher.get_cache_lazyframe("Atlantis", never_locate).await;
        assert!(matches!(
            result,
            Err(RainDayError::CityLookup(CityLookupError::LocationNotFound { .. }))
        ));
    }
}
