//! Defines the city records the precipitation archive is queried with.

use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use rainday::LatLon;
///
/// let limoges = LatLon(45.8336, 1.2611);
/// assert_eq!(limoges.0, 45.8336); // Latitude
/// assert_eq!(limoges.1, 1.2611); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// A named city from the city list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Display label as written in the city list (e.g. "Limoges").
    pub name: String,
    pub location: LatLon,
}

impl City {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            location: LatLon(latitude, longitude),
        }
    }

    /// File-system friendly key: lowercase with spaces replaced by underscores.
    ///
    /// ```
    /// use rainday::City;
    ///
    /// assert_eq!(City::cache_key("Saint Etienne"), "saint_etienne");
    /// ```
    pub fn cache_key(name: &str) -> String {
        name.trim().to_lowercase().replace(' ', "_")
    }

    /// Reverses [`City::cache_key`] into a title-cased display name.
    ///
    /// ```
    /// use rainday::City;
    ///
    /// assert_eq!(City::display_name("saint_etienne"), "Saint Etienne");
    /// ```
    pub fn display_name(key: &str) -> String {
        key.split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
