use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::is_valid_lat_lon;

/// Default map centre (latitude, longitude) when nothing can be fitted.
const DEFAULT_CENTER: Coord<f64> = Coord { x: 88.45, y: 27.35 };
const DEFAULT_ZOOM: u8 = 9;
const DEFAULT_PADDING: f64 = 0.25;
const DEFAULT_CLUSTER_RADIUS_PX: f64 = 80.0;
const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const DEFAULT_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Centre and zoom level of the visible map.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    /// Geographic centre (`x = longitude`, `y = latitude`).
    pub center: Coord<f64>,
    /// Integer zoom level.
    pub zoom: u8,
}

impl Viewport {
    pub fn new(center: Coord<f64>, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

/// Pixel dimensions of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapSize {
    pub width: u32,
    pub height: u32,
}

/// Base tile layer description.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileSource {
    /// URL template with `{s}`, `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Attribution shown in the map chrome.
    pub attribution: String,
}

impl Default for TileSource {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL.to_owned(),
            attribution: DEFAULT_ATTRIBUTION.to_owned(),
        }
    }
}

/// Deployment-level knobs for the map layer.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimap_core::{MapSettings, Viewport};
///
/// let settings = MapSettings::default()
///     .with_default_view(Viewport::new(Coord { x: 0.0, y: 51.5 }, 11))
///     .with_padding(0.1);
///
/// assert_eq!(settings.default_view.zoom, 11);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapSettings {
    /// Viewport used when there is nothing to fit.
    pub default_view: Viewport,
    /// Fractional padding applied to fitted point regions.
    pub padding: f64,
    /// Screen-space clustering radius in pixels.
    pub cluster_radius: f64,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub size: MapSize,
    /// Tile edge length in pixels.
    pub tile_size: u32,
    pub tiles: TileSource,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_view: Viewport::new(DEFAULT_CENTER, DEFAULT_ZOOM),
            padding: DEFAULT_PADDING,
            cluster_radius: DEFAULT_CLUSTER_RADIUS_PX,
            min_zoom: 0,
            max_zoom: 18,
            size: MapSize {
                width: 1024,
                height: 768,
            },
            tile_size: 256,
            tiles: TileSource::default(),
        }
    }
}

/// Errors returned by [`MapSettings::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("default centre ({lat}, {lon}) is not a valid coordinate")]
    InvalidDefaultCenter { lat: f64, lon: f64 },
    #[error("zoom range {min}..={max} is empty")]
    InvalidZoomRange { min: u8, max: u8 },
    #[error("default zoom {zoom} lies outside {min}..={max}")]
    DefaultZoomOutOfRange { zoom: u8, min: u8, max: u8 },
    #[error("padding must be a finite, non-negative fraction (got {0})")]
    InvalidPadding(f64),
    #[error("cluster radius must be positive (got {0})")]
    InvalidClusterRadius(f64),
    #[error("map size must be non-zero (got {width}x{height})")]
    EmptyMapSize { width: u32, height: u32 },
    #[error("tile size must be non-zero")]
    EmptyTileSize,
}

impl MapSettings {
    /// Override the fallback viewport.
    #[must_use]
    pub fn with_default_view(mut self, view: Viewport) -> Self {
        self.default_view = view;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_cluster_radius(mut self, radius: f64) -> Self {
        self.cluster_radius = radius;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = MapSize { width, height };
        self
    }

    /// Clamp `zoom` into the configured range.
    pub fn clamp_zoom(&self, zoom: u8) -> u8 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Reject settings the map layer cannot honour.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let center = self.default_view.center;
        if !is_valid_lat_lon(center.y, center.x) {
            return Err(SettingsError::InvalidDefaultCenter {
                lat: center.y,
                lon: center.x,
            });
        }
        if self.min_zoom > self.max_zoom {
            return Err(SettingsError::InvalidZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.default_view.zoom) {
            return Err(SettingsError::DefaultZoomOutOfRange {
                zoom: self.default_view.zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(SettingsError::InvalidPadding(self.padding));
        }
        if !self.cluster_radius.is_finite() || self.cluster_radius <= 0.0 {
            return Err(SettingsError::InvalidClusterRadius(self.cluster_radius));
        }
        if self.size.width == 0 || self.size.height == 0 {
            return Err(SettingsError::EmptyMapSize {
                width: self.size.width,
                height: self.size.height,
            });
        }
        if self.tile_size == 0 {
            return Err(SettingsError::EmptyTileSize);
        }
        Ok(())
    }
}
