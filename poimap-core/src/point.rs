use std::collections::HashMap;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Free-form display fields attached to a [`Point`].
pub type Fields = HashMap<String, String>;

/// Well-known keys inside [`Fields`].
pub mod field {
    /// Short description shown in tooltips and the detail panel.
    pub const DESCRIPTION: &str = "description";
    /// Visiting hours, e.g. `"Open: 9 AM - 6 PM"`.
    pub const VISITING: &str = "visiting";
    /// External link for further information.
    pub const LINK: &str = "link";
    /// Image URL or site-relative path.
    pub const IMAGE: &str = "image";
    /// Nearest town.
    pub const TOWN: &str = "town";
}

/// A single mappable point of interest.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use poimap_core::{Point, field};
///
/// let point = Point::from_lat_lon(1, "Rumtek Monastery", 27.3258, 88.6012)
///     .with_field(field::TOWN, "Gangtok");
///
/// assert_eq!(point.lat(), 27.3258);
/// assert_eq!(point.town(), "Gangtok");
/// assert!(point.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Unique identifier within a dataset.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Auxiliary display fields keyed by [`field`] names.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fields: Fields,
}

/// Errors returned by [`Point::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointError {
    /// Latitude or longitude is non-finite or outside the WGS84 range.
    #[error("point {id} has invalid coordinates ({lat}, {lon})")]
    InvalidLocation {
        /// Identifier of the offending point.
        id: u64,
        /// Latitude as supplied.
        lat: f64,
        /// Longitude as supplied.
        lon: f64,
    },
}

impl Point {
    /// Construct a point from a location and display fields.
    pub fn new(id: u64, name: impl Into<String>, location: Coord<f64>, fields: Fields) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            fields,
        }
    }

    /// Construct a point without auxiliary fields from a `(lat, lon)` pair.
    pub fn from_lat_lon(id: u64, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self::new(id, name, Coord { x: lon, y: lat }, Fields::new())
    }

    /// Attach a display field, replacing any previous value under `key`.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.location.x
    }

    /// Look up a display field, returning an empty string when absent.
    pub fn field(&self, key: &str) -> &str {
        self.fields.get(key).map_or("", String::as_str)
    }

    pub fn description(&self) -> &str {
        self.field(field::DESCRIPTION)
    }

    pub fn visiting_hours(&self) -> &str {
        self.field(field::VISITING)
    }

    pub fn link(&self) -> &str {
        self.field(field::LINK)
    }

    pub fn image(&self) -> &str {
        self.field(field::IMAGE)
    }

    pub fn town(&self) -> &str {
        self.field(field::TOWN)
    }

    /// Check that the location is a usable WGS84 coordinate.
    pub fn validate(&self) -> Result<(), PointError> {
        if self.has_valid_location() {
            Ok(())
        } else {
            Err(PointError::InvalidLocation {
                id: self.id,
                lat: self.lat(),
                lon: self.lon(),
            })
        }
    }

    /// Whether [`Point::validate`] would succeed.
    pub fn has_valid_location(&self) -> bool {
        is_valid_lat_lon(self.lat(), self.lon())
    }
}

/// Return `true` when `lat` and `lon` are finite and within `[-90, 90]` and
/// `[-180, 180]` respectively.
pub fn is_valid_lat_lon(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0
}
