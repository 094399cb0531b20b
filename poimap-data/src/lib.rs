//! Data sources for the point-of-interest map.
//!
//! Responsibilities:
//! - Load point datasets from JSON files and ship the built-in sample.
//! - Provide an HTTP [`poimap_core::Geocoder`] for the search control.
//!
//! Boundaries:
//! - Do not encode rendering or viewport rules (live in `poimap-layer`).
//! - Keep blocking I/O off async executors; the geocoder bridges to its own
//!   runtime.

pub mod dataset;
pub mod geocoding;

pub use dataset::{BUILTIN_NAME, DatasetError, load_dataset, monasteries, parse_dataset};
pub use geocoding::{GeocoderBuildError, NominatimConfig, NominatimGeocoder};
