use crate::config::ArchiveConfig;
use crate::types::city::City;
use crate::types::precipitation_frame::{DATETIME_COLUMN, PRECIPITATION_COLUMN};
use crate::weather_data::error::WeatherDataError;
use chrono::NaiveDateTime;
use log::{info, warn};
use polars::prelude::*;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::{fs, task};

const CACHE_FILE_SUFFIX: &str = "_weather_data.csv";
const ARCHIVE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: HourlySeries,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    time: Vec<String>,
    precipitation: Vec<Option<f64>>,
}

pub struct WeatherDataLoader {
    cache_dir: PathBuf,
    archive: ArchiveConfig,
    download_client: Client,
}

impl WeatherDataLoader {
    pub fn new(cache_dir: &Path, archive: ArchiveConfig) -> WeatherDataLoader {
        WeatherDataLoader {
            cache_dir: cache_dir.to_path_buf(),
            archive,
            download_client: Client::new(),
        }
    }

    pub fn cache_path(&self, city_name: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}{}", City::cache_key(city_name), CACHE_FILE_SUFFIX))
    }

    /// Creates the cache directory and its parents if missing. Fails if the path
    /// exists but is not a directory.
    pub async fn ensure_cache_dir(&self) -> Result<(), WeatherDataError> {
        if fs::metadata(&self.cache_dir).await.is_err() {
            info!("Creating cache directory: {}", self.cache_dir.display());
        }
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| WeatherDataError::CacheDirCreation(self.cache_dir.clone(), e))
    }

    pub async fn is_cached(&self, city_name: &str) -> bool {
        fs::metadata(self.cache_path(city_name)).await.is_ok()
    }

    /// Scans the cached CSV for a city. The file must exist.
    pub fn scan_cached(&self, city_name: &str) -> Result<LazyFrame, WeatherDataError> {
        let csv_path = self.cache_path(city_name);
        info!("Loading cached precipitation for {} from {:?}", city_name, csv_path);
        // Inference would type an all-integer prefix as i64 and then fail on the
        // first decimal value further down.
        let precipitation_schema = Schema::from_iter([Field::new(
            PRECIPITATION_COLUMN.into(),
            DataType::Float64,
        )]);
        let frame = LazyCsvReader::new(&csv_path)
            .with_has_header(true)
            .with_try_parse_dates(true)
            .with_dtype_overwrite(Some(Arc::new(precipitation_schema)))
            .finish()
            .map_err(|e| WeatherDataError::CsvScan(csv_path.clone(), e))?;
        Ok(frame.select([
            col(DATETIME_COLUMN).cast(DataType::Datetime(TimeUnit::Milliseconds, None)),
            col(PRECIPITATION_COLUMN),
        ]))
    }

    /// Downloads the configured archive period for `city`, writes it to the CSV cache
    /// and returns a scan of the written file.
    pub async fn download_and_cache(&self, city: &City) -> Result<LazyFrame, WeatherDataError> {
        warn!(
            "Cache miss for city {}. Downloading and processing.",
            city.name
        );
        let series = self.download(city).await?;
        let df = Self::series_to_dataframe(series, &city.name).await?;

        self.ensure_cache_dir().await?;

        let csv_path = self.cache_path(&city.name);
        Self::cache_dataframe(df, &self.cache_dir, &csv_path).await?;
        info!("Cached precipitation for {} to {:?}", city.name, csv_path);

        self.scan_cached(&city.name)
    }

    /// Lists the display names of every city with a cache file, sorted.
    pub async fn cached_cities(&self) -> Result<Vec<String>, WeatherDataError> {
        let mut cities = Vec::new();
        let mut entries = match fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(cities),
            Err(e) => return Err(WeatherDataError::CacheDirRead(self.cache_dir.clone(), e)),
        };
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| WeatherDataError::CacheDirRead(self.cache_dir.clone(), e))?
        {
            let file_name = entry.file_name();
            if let Some(key) = file_name.to_str().and_then(|n| n.strip_suffix(CACHE_FILE_SUFFIX)) {
                cities.push(City::display_name(key));
            }
        }
        cities.sort();
        Ok(cities)
    }

    async fn download(&self, city: &City) -> Result<HourlySeries, WeatherDataError> {
        let url = self.archive.base_url.clone();
        info!(
            "Downloading hourly precipitation for {} ({}, {}) from {}",
            city.name, city.location.0, city.location.1, url
        );

        let response = self
            .download_client
            .get(&url)
            .query(&[
                ("latitude", city.location.0.to_string()),
                ("longitude", city.location.1.to_string()),
                ("start_date", self.archive.start_date.to_string()),
                ("end_date", self.archive.end_date.to_string()),
                ("hourly", "precipitation".to_string()),
                ("timezone", self.archive.timezone.clone()),
            ])
            .send()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    WeatherDataError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    WeatherDataError::NetworkRequest(url, e)
                });
            }
        };

        let body: ArchiveResponse =
            response
                .json()
                .await
                .map_err(|e| WeatherDataError::ResponseDecode {
                    city: city.name.clone(),
                    source: e,
                })?;
        info!(
            "Downloaded {} hourly values for {}",
            body.hourly.time.len(),
            city.name
        );
        Ok(body.hourly)
    }

    /// Parses the archive arrays into a two-column DataFrame using a blocking task.
    async fn series_to_dataframe(
        series: HourlySeries,
        city: &str,
    ) -> Result<DataFrame, WeatherDataError> {
        let city_owned = city.to_string();
        task::spawn_blocking(move || build_frame(series, &city_owned)).await?
    }

    /// Writes a DataFrame to a temp file in `dir` and moves it over `path`, so a
    /// partially written cache is never visible.
    async fn cache_dataframe(
        mut df: DataFrame,
        dir: &Path,
        path: &Path,
    ) -> Result<(), WeatherDataError> {
        let dir_buf = dir.to_path_buf();
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let mut temp_file = NamedTempFile::new_in(&dir_buf)
                .map_err(|e| WeatherDataError::CsvWriteIo(path_buf.clone(), e))?;
            CsvWriter::new(temp_file.as_file_mut())
                .include_header(true)
                .finish(&mut df)
                .map_err(|e| WeatherDataError::CsvWritePolars(path_buf.clone(), e))?;
            temp_file
                .persist(&path_buf)
                .map_err(|e| WeatherDataError::CsvWriteIo(path_buf, e.error))?;
            Ok::<(), WeatherDataError>(())
        })
        .await??;
        Ok(())
    }
}

fn build_frame(series: HourlySeries, city: &str) -> Result<DataFrame, WeatherDataError> {
    if series.time.len() != series.precipitation.len() {
        return Err(WeatherDataError::LengthMismatch {
            city: city.to_string(),
            times: series.time.len(),
            values: series.precipitation.len(),
        });
    }

    let stamps = series
        .time
        .iter()
        .map(|t| {
            NaiveDateTime::parse_from_str(t, ARCHIVE_TIME_FORMAT).map_err(|e| {
                WeatherDataError::MalformedTimestamp {
                    city: city.to_string(),
                    value: t.clone(),
                    source: e,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let datetime =
        DatetimeChunked::from_naive_datetime(DATETIME_COLUMN.into(), stamps, TimeUnit::Milliseconds)
            .into_series();
    let precipitation = Series::new(PRECIPITATION_COLUMN.into(), series.precipitation);

    Ok(DataFrame::new(vec![datetime.into(), precipitation.into()])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::precipitation_frame::PrecipitationLazyFrame;
    use chrono::NaiveDate;
    use std::io::Write;

    fn series() -> HourlySeries {
        HourlySeries {
            time: vec![
                "2024-05-11T00:00".to_string(),
                "2024-05-11T01:00".to_string(),
                "2024-05-11T02:00".to_string(),
            ],
            precipitation: vec![Some(0.05), None, Some(0.2)],
        }
    }

    fn loader(dir: &Path) -> WeatherDataLoader {
        WeatherDataLoader::new(dir, ArchiveConfig::default())
    }

    #[test]
    fn test_parse_archive_json() {
        let json = r#"{"latitude":45.8,"longitude":1.25,"hourly_units":{"time":"iso8601","precipitation":"mm"},
            "hourly":{"time":["2024-01-01T00:00","2024-01-01T01:00"],"precipitation":[0.0,null]}}"#;
        let parsed: ArchiveResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.hourly.time.len(), 2);
        assert_eq!(parsed.hourly.precipitation, vec![Some(0.0), None]);
    }

    #[test]
    fn test_build_frame_shape() {
        let df = build_frame(series(), "Limoges").unwrap();
        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.column(PRECIPITATION_COLUMN).unwrap().null_count(), 1);
    }

    #[test]
    fn test_build_frame_rejects_mismatch() {
        let mut s = series();
        s.precipitation.pop();
        assert!(matches!(
            build_frame(s, "Limoges"),
            Err(WeatherDataError::LengthMismatch { times: 3, values: 2, .. })
        ));
    }

    #[test]
    fn test_build_frame_rejects_bad_timestamp() {
        let mut s = series();
        s.time[1] = "yesterday".to_string();
        assert!(matches!(
            build_frame(s, "Limoges"),
            Err(WeatherDataError::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_cache_path_naming() {
        let l = loader(Path::new("/cache"));
        assert_eq!(
            l.cache_path("Saint Etienne"),
            PathBuf::from("/cache/saint_etienne_weather_data.csv")
        );
    }

    #[tokio::test]
    async fn test_cache_round_trip_through_csv() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let l = loader(dir.path());
        assert!(!l.is_cached("Limoges").await);

        let df = build_frame(series(), "Limoges")?;
        WeatherDataLoader::cache_dataframe(df, dir.path(), &l.cache_path("Limoges")).await?;
        assert!(l.is_cached("Limoges").await);

        let observations =
            PrecipitationLazyFrame::new(l.scan_cached("Limoges")?).collect_observations()?;
        let day = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].timestamp, day.and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(observations[1].timestamp, day.and_hms_opt(2, 0, 0).unwrap());
        assert_eq!(observations[1].precipitation_mm, 0.2);

        assert_eq!(l.cached_cities().await?, vec!["Limoges".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_scan_cached_reads_integer_prefix_as_float(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let l = loader(dir.path());
        let mut csv = std::fs::File::create(l.cache_path("Brest"))?;
        writeln!(csv, "datetime,precipitation")?;
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for h in 0..150 {
            let ts = start + chrono::Duration::hours(h);
            let mm = if h == 149 { "1.5" } else { "0" };
            writeln!(csv, "{},{}", ts.format("%Y-%m-%dT%H:%M:%S%.3f"), mm)?;
        }
        drop(csv);

        let observations =
            PrecipitationLazyFrame::new(l.scan_cached("Brest")?).collect_observations()?;
        assert_eq!(observations.len(), 150);
        assert_eq!(observations[0].precipitation_mm, 0.0);
        assert_eq!(observations[149].precipitation_mm, 1.5);
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_cache_dir_creates_nested() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        let l = loader(&nested);
        l.ensure_cache_dir().await.unwrap();
        assert!(nested.is_dir());
        l.ensure_cache_dir().await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_cache_dir_rejects_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            loader(file.path()).ensure_cache_dir().await,
            Err(WeatherDataError::CacheDirCreation(..))
        ));
    }

    #[tokio::test]
    async fn test_cached_cities_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let l = loader(&dir.path().join("absent"));
        assert!(l.cached_cities().await.unwrap().is_empty());
    }
}
