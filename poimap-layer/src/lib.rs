//! Interactive map layer for points of interest.
//!
//! The crate models the map library headlessly. [`MapInstance`] is the one
//! mutable resource: it owns the viewport, the layer stack, the control
//! chrome and the tooltip slot. Components never hold on to it; each
//! operation receives it as `&mut MapInstance` and keeps only the
//! [`LayerId`] or [`ControlId`] it attached.
//!
//! [`MapHost`] wires the components together:
//!
//! - [`ClusterLayer`] turns a [`PointSet`](poimap_core::PointSet) into
//!   markers with hover and click handlers and clusters them per zoom.
//! - [`ViewportController`] fits the viewport to points or regions.
//! - [`SearchControl`] applies confirmed geocoder results.
//! - [`ExportControl`] serialises the dataset to GPX on demand.
//! - [`SelectionPanel`] shows the single selected point.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod export;
mod host;
pub mod map;
pub mod search;
mod selection;
mod viewport;

pub use cluster::{
    Cluster, ClusterLayer, Interaction, Marker, MarkerAction, RenderReport, TooltipContent,
};
pub use export::{Download, DownloadSink, ExportControl, ExportError, GPX_MIME_TYPE};
pub use host::{HostEnvironment, HostError, MapHost};
pub use map::{
    ControlContext, ControlDescriptor, ControlId, ControlOutput, ControlPosition, ControlView,
    LayerId, LayerKind, MapError, MapInstance, OpenTooltip,
};
pub use search::{GeocodeEvent, PendingQuery, QueryToken, SearchControl, SearchOutcome};
pub use selection::{PanelView, Selection, SelectionPanel};
pub use viewport::{FitOutcome, ViewportController};
