//! View command: fit the map to the dataset and report its clusters.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use poimap_core::MapSettings;
use poimap_layer::{Cluster, FitOutcome, HostEnvironment, MapHost};
use serde::{Deserialize, Serialize};

use crate::settings::{LatLon, MapOverrides, RegionReport, ViewReport, load_points, write_json};
use crate::{
    ARG_CENTER_LAT, ARG_CENTER_LON, ARG_CLUSTER_RADIUS, ARG_DATASET, ARG_DEFAULT_ZOOM,
    ARG_HEIGHT, ARG_PADDING, ARG_WIDTH, ARG_ZOOM, CliError,
};

/// CLI arguments for the `view` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Mount a headless map over the dataset, fit the viewport \
                 around every valid point and print the viewport together \
                 with the marker clusters as JSON. --zoom re-clusters at a \
                 different zoom level after fitting.",
    about = "Print the fitted viewport and clusters"
)]
#[ortho_config(prefix = "POIMAP")]
pub(crate) struct ViewArgs {
    /// Path to a JSON dataset.
    #[arg(long = ARG_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Zoom level at which to report clusters.
    #[arg(long = ARG_ZOOM, value_name = "level")]
    #[serde(default)]
    pub(crate) zoom: Option<u8>,
    /// Latitude of the fallback viewport.
    #[arg(long = ARG_CENTER_LAT, value_name = "deg", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) center_lat: Option<f64>,
    /// Longitude of the fallback viewport.
    #[arg(long = ARG_CENTER_LON, value_name = "deg", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) center_lon: Option<f64>,
    /// Zoom of the fallback viewport.
    #[arg(long = ARG_DEFAULT_ZOOM, value_name = "level")]
    #[serde(default)]
    pub(crate) default_zoom: Option<u8>,
    /// Fractional padding around fitted points.
    #[arg(long = ARG_PADDING, value_name = "fraction")]
    #[serde(default)]
    pub(crate) padding: Option<f64>,
    /// Clustering radius in screen pixels.
    #[arg(long = ARG_CLUSTER_RADIUS, value_name = "px")]
    #[serde(default)]
    pub(crate) cluster_radius: Option<f64>,
    /// Map width in pixels.
    #[arg(long = ARG_WIDTH, value_name = "px")]
    #[serde(default)]
    pub(crate) width: Option<u32>,
    /// Map height in pixels.
    #[arg(long = ARG_HEIGHT, value_name = "px")]
    #[serde(default)]
    pub(crate) height: Option<u32>,
}

impl ViewArgs {
    pub(crate) fn into_config(self) -> Result<ViewConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ViewConfig::try_from(merged)
    }
}

/// Resolved `view` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ViewConfig {
    pub(crate) dataset: Option<Utf8PathBuf>,
    pub(crate) zoom: Option<u8>,
    pub(crate) settings: MapSettings,
}

impl TryFrom<ViewArgs> for ViewConfig {
    type Error = CliError;

    fn try_from(args: ViewArgs) -> Result<Self, Self::Error> {
        let overrides = MapOverrides {
            center_lat: args.center_lat,
            center_lon: args.center_lon,
            default_zoom: args.default_zoom,
            padding: args.padding,
            cluster_radius: args.cluster_radius,
            width: args.width,
            height: args.height,
        };
        Ok(Self {
            dataset: args.dataset,
            zoom: args.zoom,
            settings: overrides.into_settings()?,
        })
    }
}

/// One cluster glyph in the `view` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ClusterReport {
    pub(crate) label: String,
    pub(crate) center: LatLon,
    pub(crate) members: Vec<u64>,
}

impl From<&Cluster> for ClusterReport {
    fn from(cluster: &Cluster) -> Self {
        Self {
            label: cluster.label(),
            center: cluster.center.into(),
            members: cluster.members.clone(),
        }
    }
}

/// JSON document printed by `view`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ViewOutput {
    pub(crate) dataset: String,
    pub(crate) markers: usize,
    pub(crate) skipped: usize,
    /// `true` when there was nothing to fit and the default view was used.
    pub(crate) fallback: bool,
    pub(crate) region: Option<RegionReport>,
    pub(crate) viewport: ViewReport,
    pub(crate) clusters: Vec<ClusterReport>,
}

pub(crate) fn run_view(args: ViewArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_view_with(config, writer)
}

pub(crate) fn run_view_with(config: ViewConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let points = load_points(config.dataset.as_deref())?;
    let dataset = points.name().to_owned();
    let total = points.len();

    let mut host = MapHost::new(config.settings)?;
    let fit: FitOutcome = host.mount(HostEnvironment::Interactive, points)?;
    let viewport = match config.zoom {
        Some(zoom) => host.set_zoom(zoom)?,
        None => fit.viewport(),
    };
    let clusters = host.clusters()?;
    let markers = host.cluster_layer().map_or(0, |layer| layer.marker_count());
    host.unmount()?;

    let output = ViewOutput {
        dataset,
        markers,
        skipped: total.saturating_sub(markers),
        fallback: fit.is_fallback(),
        region: fit.region().map(RegionReport::from),
        viewport: viewport.into(),
        clusters: clusters.iter().map(ClusterReport::from).collect(),
    };
    write_json(writer, &output)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ViewConfig, CliError> {
    let merged = ViewArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ViewConfig::try_from(merged)
}
