//! Export command: press the GPX button on a headless map.

use std::io::{self, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use poimap_core::MapSettings;
use poimap_layer::{Download, DownloadSink, HostEnvironment, MapHost};
use serde::{Deserialize, Serialize};

use crate::settings::load_points;
use crate::{ARG_DATASET, ARG_OUTPUT_DIR, CliError};

/// CLI arguments for the `export` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Mount a headless map over the dataset, activate its export \
                 control and save the resulting GPX track into the output \
                 directory. Without --dataset the built-in sample is used.",
    about = "Export the dataset as a GPX track"
)]
#[ortho_config(prefix = "POIMAP")]
pub(crate) struct ExportArgs {
    /// Path to a JSON dataset.
    #[arg(long = ARG_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Directory receiving the GPX file. Defaults to the working directory.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
}

impl ExportArgs {
    pub(crate) fn into_config(self) -> Result<ExportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExportConfig::try_from(merged)
    }
}

/// Resolved `export` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportConfig {
    pub(crate) dataset: Option<Utf8PathBuf>,
    pub(crate) output_dir: Utf8PathBuf,
}

impl TryFrom<ExportArgs> for ExportConfig {
    type Error = CliError;

    fn try_from(args: ExportArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            dataset: args.dataset,
            output_dir: args.output_dir.unwrap_or_else(|| Utf8PathBuf::from(".")),
        })
    }
}

/// Saves downloads into a directory on disk.
#[derive(Debug)]
pub(crate) struct DirectorySink {
    dir: Utf8PathBuf,
    written: Vec<Utf8PathBuf>,
}

impl DirectorySink {
    pub(crate) fn new(dir: Utf8PathBuf) -> Self {
        Self {
            dir,
            written: Vec::new(),
        }
    }

    pub(crate) fn written(&self) -> &[Utf8PathBuf] {
        &self.written
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, download: Download) -> io::Result<()> {
        let path = poimap_fs::write_into_dir(&self.dir, &download.file_name, &download.bytes)?;
        log::info!("wrote {} bytes to {path}", download.bytes.len());
        self.written.push(path);
        Ok(())
    }
}

pub(crate) fn run_export(args: ExportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_export_with(&config, writer)
}

pub(crate) fn run_export_with(
    config: &ExportConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let points = load_points(config.dataset.as_deref())?;
    let mut host = MapHost::new(MapSettings::default())?;
    host.mount(HostEnvironment::Interactive, points)?;

    let mut sink = DirectorySink::new(config.output_dir.clone());
    let exported = host.export(&mut sink);
    host.unmount()?;
    exported?.ok_or(CliError::NothingExported)?;

    for path in sink.written() {
        writeln!(writer, "{path}").map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ExportConfig, CliError> {
    let merged = ExportArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ExportConfig::try_from(merged)
}
