//! Inputs shared between subcommands: dataset selection, map setting
//! overrides and JSON output.

use std::io::Write;

use camino::Utf8Path;
use geo::Coord;
use poimap_core::{BoundingRegion, MapSettings, PointSet, Viewport};
use poimap_data::{load_dataset, monasteries};
use serde::Serialize;

use crate::{ARG_DATASET, CliError};

/// Map setting overrides collected from a subcommand's arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct MapOverrides {
    pub(crate) center_lat: Option<f64>,
    pub(crate) center_lon: Option<f64>,
    pub(crate) default_zoom: Option<u8>,
    pub(crate) padding: Option<f64>,
    pub(crate) cluster_radius: Option<f64>,
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
}

impl MapOverrides {
    /// Apply the overrides on top of [`MapSettings::default`] and validate.
    pub(crate) fn into_settings(self) -> Result<MapSettings, CliError> {
        let mut settings = MapSettings::default();
        let view = settings.default_view;
        let center = Coord {
            x: self.center_lon.unwrap_or(view.center.x),
            y: self.center_lat.unwrap_or(view.center.y),
        };
        settings.default_view = Viewport::new(center, self.default_zoom.unwrap_or(view.zoom));
        if let Some(padding) = self.padding {
            settings.padding = padding;
        }
        if let Some(radius) = self.cluster_radius {
            settings.cluster_radius = radius;
        }
        settings.size.width = self.width.unwrap_or(settings.size.width);
        settings.size.height = self.height.unwrap_or(settings.size.height);
        settings.validate()?;
        Ok(settings)
    }
}

/// Load `path`, or the built-in sample when no dataset is given.
pub(crate) fn load_points(path: Option<&Utf8Path>) -> Result<PointSet, CliError> {
    let Some(path) = path else {
        log::info!("no dataset given; using the built-in sample");
        return Ok(monasteries());
    };
    require_existing(path, ARG_DATASET)?;
    Ok(load_dataset(path)?)
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match poimap_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// A coordinate as printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, serde::Deserialize)]
pub(crate) struct LatLon {
    pub(crate) lat: f64,
    pub(crate) lon: f64,
}

impl From<Coord<f64>> for LatLon {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lon: coord.x,
        }
    }
}

/// A viewport as printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, serde::Deserialize)]
pub(crate) struct ViewReport {
    pub(crate) center: LatLon,
    pub(crate) zoom: u8,
}

impl From<Viewport> for ViewReport {
    fn from(view: Viewport) -> Self {
        Self {
            center: view.center.into(),
            zoom: view.zoom,
        }
    }
}

/// A bounding region as printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, serde::Deserialize)]
pub(crate) struct RegionReport {
    pub(crate) south_west: LatLon,
    pub(crate) north_east: LatLon,
}

impl From<&BoundingRegion> for RegionReport {
    fn from(region: &BoundingRegion) -> Self {
        Self {
            south_west: region.southwest().into(),
            north_east: region.northeast().into(),
        }
    }
}

pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
