//! Command-line interface for the headless point-of-interest map.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod export;
mod search;
mod settings;
mod view;

pub use error::CliError;

pub(crate) use export::ExportArgs;
pub(crate) use search::SearchArgs;
pub(crate) use view::ViewArgs;

pub(crate) const ARG_DATASET: &str = "dataset";
pub(crate) const ARG_OUTPUT_DIR: &str = "output-dir";
pub(crate) const ARG_ZOOM: &str = "zoom";
pub(crate) const ARG_SEARCH_QUERY: &str = "query";
pub(crate) const ARG_GEOCODER_URL: &str = "geocoder-url";
pub(crate) const ARG_GEOCODER_TIMEOUT: &str = "geocoder-timeout";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";
pub(crate) const ARG_CENTER_LAT: &str = "center-lat";
pub(crate) const ARG_CENTER_LON: &str = "center-lon";
pub(crate) const ARG_DEFAULT_ZOOM: &str = "default-zoom";
pub(crate) const ARG_PADDING: &str = "padding";
pub(crate) const ARG_CLUSTER_RADIUS: &str = "cluster-radius";
pub(crate) const ARG_WIDTH: &str = "width";
pub(crate) const ARG_HEIGHT: &str = "height";
pub(crate) const ENV_SEARCH_QUERY: &str = "POIMAP_CMDS_SEARCH_QUERY";

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Export(args) => export::run_export(args, &mut stdout),
        Command::View(args) => view::run_view(args, &mut stdout),
        Command::Search(args) => search::run_search(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "poimap",
    about = "Headless interactive map of points of interest",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Write the dataset as a GPX track.
    Export(ExportArgs),
    /// Print the fitted viewport and its clusters as JSON.
    View(ViewArgs),
    /// Geocode a place and print the viewport fitted to it.
    Search(SearchArgs),
}

#[cfg(test)]
mod tests;
