//! Facade crate for the point-of-interest map.
//!
//! This crate re-exports the domain types and the map layer, and exposes the
//! dataset loaders and HTTP geocoder behind the `data` feature.

#![forbid(unsafe_code)]

pub use poimap_core::{
    BoundingRegion, BoundsError, Fields, GeocodeError, GeocodeResult, Geocoder, MapSettings,
    MapSize, MemoryPointStore, Point, PointError, PointSet, PointStore, SettingsError,
    TileSource, Viewport, field,
};

pub use poimap_layer::{
    Cluster, ClusterLayer, Download, DownloadSink, ExportControl, ExportError, FitOutcome,
    GeocodeEvent, HostEnvironment, HostError, Interaction, MapError, MapHost, MapInstance,
    PanelView, SearchControl, SearchOutcome, Selection, SelectionPanel, ViewportController,
};

#[cfg(feature = "data")]
pub use poimap_data::{
    DatasetError, GeocoderBuildError, NominatimConfig, NominatimGeocoder, load_dataset,
    monasteries, parse_dataset,
};
