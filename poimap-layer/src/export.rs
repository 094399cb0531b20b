//! GPX export button.
//!
//! The control is attached to the map chrome independently of the cluster
//! layer, so it works even when no marker is rendered. Activation serialises
//! the full dataset, not the visible subset, and hands the bytes back as a
//! [`Download`] for the host to save. Nothing is sent over the network.

use std::io;

use gpx::errors::GpxError;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};
use poimap_core::PointSet;
use thiserror::Error;

use crate::map::{
    ControlDescriptor, ControlId, ControlOutput, ControlPosition, ControlView, MapError,
    MapInstance,
};

/// Content type of GPX documents.
pub const GPX_MIME_TYPE: &str = "application/gpx+xml";

const CONTROL_NAME: &str = "export";
const CREATOR: &str = "poimap";

/// Errors raised while producing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The `gpx` writer rejected the document.
    #[error("failed to serialise GPX document: {0}")]
    Serialise(#[from] GpxError),
}

/// A file produced client-side for the user to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name, e.g. `monasteries.gpx`.
    pub file_name: String,
    /// Content type offered with the file.
    pub mime_type: &'static str,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Destination for finished downloads.
pub trait DownloadSink {
    /// Persist or offer `download` to the user.
    fn deliver(&mut self, download: Download) -> io::Result<()>;
}

/// Collects downloads in memory.
impl DownloadSink for Vec<Download> {
    fn deliver(&mut self, download: Download) -> io::Result<()> {
        self.push(download);
        Ok(())
    }
}

/// Lower-case, hyphen-separated file stem for a dataset name.
///
/// # Examples
/// ```
/// use poimap_layer::export::slug;
///
/// assert_eq!(slug("Sikkim Monasteries"), "sikkim-monasteries");
/// assert_eq!(slug("  "), "points");
/// ```
pub fn slug(name: &str) -> String {
    let joined = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if joined.is_empty() {
        "points".to_owned()
    } else {
        joined
    }
}

/// Build the GPX document for `points`: one track, one segment, and one
/// track point per valid point in store order.
pub fn to_gpx(points: &PointSet) -> Gpx {
    let mut segment = TrackSegment::new();
    segment.points = points
        .valid_points()
        .map(|point| {
            let mut waypoint = Waypoint::new(geo::Point::from(point.location));
            waypoint.name = Some(point.name.clone());
            waypoint
        })
        .collect();

    let mut track = Track::new();
    track.name = Some(format!("{} Route", points.name()));
    track.segments.push(segment);

    let mut document = Gpx::default();
    document.version = GpxVersion::Gpx11;
    document.creator = Some(CREATOR.to_owned());
    document.tracks.push(track);
    document
}

/// Serialise `points` as GPX into `writer`.
pub fn write_gpx<W: io::Write>(points: &PointSet, writer: W) -> Result<(), ExportError> {
    gpx::write(&to_gpx(points), writer)?;
    Ok(())
}

/// Serialise `points` into a named download.
pub fn export_download(points: &PointSet) -> Result<Download, ExportError> {
    let mut bytes = Vec::new();
    write_gpx(points, &mut bytes)?;
    Ok(Download {
        file_name: format!("{}.gpx", slug(points.name())),
        mime_type: GPX_MIME_TYPE,
        bytes,
    })
}

/// The always-visible export button.
#[derive(Debug, Default)]
pub struct ExportControl {
    control: Option<ControlId>,
}

impl ExportControl {
    /// A control not yet in any chrome.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject the button into the map chrome. Attaching twice keeps the
    /// existing button.
    pub fn attach(&mut self, map: &mut MapInstance) -> ControlId {
        if let Some(id) = self.control {
            return id;
        }
        let descriptor = ControlDescriptor::new(CONTROL_NAME, ControlPosition::TopRight, || {
            ControlView {
                class: "leaflet-bar poimap-export".to_owned(),
                content: "⬇ GPX".to_owned(),
            }
        })
        .on_activate(|context| match export_download(context.points) {
            Ok(download) => ControlOutput::Download(download),
            Err(err) => {
                log::error!("export of {} failed: {err}", context.points.name());
                ControlOutput::Failed {
                    control: CONTROL_NAME,
                    message: err.to_string(),
                }
            }
        });
        let id = map.add_control(descriptor);
        self.control = Some(id);
        id
    }

    /// Remove the button. Detaching twice is a no-op.
    pub fn detach(&mut self, map: &mut MapInstance) -> Result<(), MapError> {
        match self.control.take() {
            Some(id) => map.remove_control(id).map(drop),
            None => Ok(()),
        }
    }

    /// Id of the attached button.
    #[must_use]
    pub const fn id(&self) -> Option<ControlId> {
        self.control
    }
}
