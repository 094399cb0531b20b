//! Search command: geocode a place and fit the map to it.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use poimap_core::{Geocoder, MapSettings};
use poimap_data::{NominatimConfig, NominatimGeocoder};
use poimap_layer::{HostEnvironment, HostError, MapHost, MapInstance, SearchOutcome};
use serde::{Deserialize, Serialize};

use crate::settings::{MapOverrides, RegionReport, ViewReport, load_points, write_json};
use crate::{
    ARG_CENTER_LAT, ARG_CENTER_LON, ARG_CLUSTER_RADIUS, ARG_DATASET, ARG_DEFAULT_ZOOM,
    ARG_GEOCODER_TIMEOUT, ARG_GEOCODER_URL, ARG_HEIGHT, ARG_PADDING, ARG_SEARCH_QUERY,
    ARG_USER_AGENT, ARG_WIDTH, CliError, ENV_SEARCH_QUERY,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Mount a headless map over the dataset, send the query to a \
                 Nominatim-compatible geocoder and fit the viewport to the \
                 first result's bounding box. The resulting viewport is \
                 printed as JSON.",
    about = "Geocode a place and fit the map to it"
)]
#[ortho_config(prefix = "POIMAP")]
pub(crate) struct SearchArgs {
    /// Free-text place query.
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Path to a JSON dataset.
    #[arg(long = ARG_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Base URL of the geocoding service.
    #[arg(long = ARG_GEOCODER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_url: Option<String>,
    /// Geocoder request timeout in seconds.
    #[arg(long = ARG_GEOCODER_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) geocoder_timeout: Option<u64>,
    /// User agent sent to the geocoder.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
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

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct SearchConfig {
    pub(crate) query: String,
    pub(crate) dataset: Option<Utf8PathBuf>,
    pub(crate) geocoder: NominatimConfig,
    pub(crate) settings: MapSettings,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let query = args
            .query
            .filter(|query| !query.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_SEARCH_QUERY,
                env: ENV_SEARCH_QUERY,
            })?;

        let mut geocoder = NominatimConfig::default();
        if let Some(url) = args.geocoder_url {
            geocoder.base_url = url;
        }
        if let Some(secs) = args.geocoder_timeout {
            geocoder = geocoder.with_timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = args.user_agent {
            geocoder = geocoder.with_user_agent(agent);
        }

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
            query,
            dataset: args.dataset,
            geocoder,
            settings: overrides.into_settings()?,
        })
    }
}

/// Builds the geocoder for the current search invocation.
pub(crate) trait GeocoderBuilder {
    fn build(&self, config: &NominatimConfig) -> Result<Box<dyn Geocoder>, CliError>;
}

pub(crate) struct NominatimGeocoderBuilder;

impl GeocoderBuilder for NominatimGeocoderBuilder {
    fn build(&self, config: &NominatimConfig) -> Result<Box<dyn Geocoder>, CliError> {
        let geocoder = NominatimGeocoder::with_config(config.clone()).map_err(|source| {
            CliError::BuildGeocoder {
                base_url: config.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(geocoder))
    }
}

/// How the search ended, as printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SearchStatus {
    Applied,
    NoResults,
    Failed,
}

/// JSON document printed by `search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SearchOutput {
    pub(crate) query: String,
    pub(crate) status: SearchStatus,
    /// Label of the applied place.
    pub(crate) place: Option<String>,
    /// Provider error message when the lookup failed.
    pub(crate) error: Option<String>,
    pub(crate) region: Option<RegionReport>,
    pub(crate) viewport: ViewReport,
}

pub(crate) fn run_search(args: SearchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_search_with(&config, &NominatimGeocoderBuilder, writer)
}

pub(crate) fn run_search_with(
    config: &SearchConfig,
    builder: &dyn GeocoderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let points = load_points(config.dataset.as_deref())?;
    let geocoder = builder.build(&config.geocoder)?;

    let mut host = MapHost::new(config.settings.clone())?;
    host.mount(HostEnvironment::Interactive, points)?;
    let outcome = host.search(&config.query, geocoder.as_ref())?;
    let viewport = host.map().map(MapInstance::viewport);
    host.unmount()?;
    let viewport = viewport.ok_or(CliError::Map(HostError::NotMounted))?;

    let mut output = SearchOutput {
        query: config.query.clone(),
        status: SearchStatus::NoResults,
        place: None,
        error: None,
        region: None,
        viewport: viewport.into(),
    };
    match outcome {
        Some(SearchOutcome::Applied { result, fit }) => {
            output.status = SearchStatus::Applied;
            output.region = fit.region().map(RegionReport::from);
            output.place = Some(result.name);
        }
        Some(SearchOutcome::Failed(err)) => {
            log::warn!("geocoding {:?} failed: {err}", config.query);
            output.status = SearchStatus::Failed;
            output.error = Some(err.to_string());
        }
        _ => {}
    }
    write_json(writer, &output)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchConfig::try_from(merged)
}
