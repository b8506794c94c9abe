use crate::cities::error::CityLookupError;
use crate::types::city::City;
use log::{info, warn};
use polars::prelude::*;
use std::path::Path;

const LABEL_COLUMN: &str = "label";
const LATITUDE_COLUMN: &str = "latitude";
const LONGITUDE_COLUMN: &str = "longitude";

/// Resolves city names to coordinates using a CSV city list with `label`,
/// `latitude` and `longitude` columns.
#[derive(Debug, Clone)]
pub struct CityLocator {
    cities: Vec<City>,
}

impl CityLocator {
    pub fn from_csv(path: &Path) -> Result<Self, CityLookupError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|e| CityLookupError::CsvRead(path.to_path_buf(), e))?;

        let column = |name: &'static str, dtype: DataType| {
            df.column(name)
                .and_then(|c| c.cast(&dtype))
                .map_err(|source| CityLookupError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name,
                    source,
                })
        };
        let labels = column(LABEL_COLUMN, DataType::String)?;
        let latitudes = column(LATITUDE_COLUMN, DataType::Float64)?;
        let longitudes = column(LONGITUDE_COLUMN, DataType::Float64)?;

        let read_err = |e| CityLookupError::CsvRead(path.to_path_buf(), e);
        let mut cities = Vec::with_capacity(df.height());
        let mut skipped = 0usize;
        for ((label, lat), lon) in labels
            .str()
            .map_err(read_err)?
            .into_iter()
            .zip(latitudes.f64().map_err(read_err)?)
            .zip(longitudes.f64().map_err(read_err)?)
        {
            match (label, lat, lon) {
                (Some(label), Some(lat), Some(lon)) => cities.push(City::new(label, lat, lon)),
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!("Skipped {} incomplete rows in {:?}", skipped, path);
        }
        info!("Loaded {} cities from {:?}", cities.len(), path);

        Ok(Self::from_cities(cities))
    }

    pub fn from_cities(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// Case-insensitive lookup by label. The first matching row wins.
    pub fn find(&self, name: &str) -> Result<&City, CityLookupError> {
        let wanted = name.trim().to_lowercase();
        self.cities
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
            .ok_or_else(|| CityLookupError::LocationNotFound {
                city: name.to_string(),
            })
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }
}
