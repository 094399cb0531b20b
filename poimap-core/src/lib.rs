//! Core domain types for the poimap map layer.
//!
//! The crate models points of interest, the immutable snapshots handed to the
//! map layer, bounding regions and viewports, and the geocoding boundary.
//! Nothing here touches a map instance; the `poimap-layer` crate builds the
//! interactive pieces on top of these types.

#![forbid(unsafe_code)]

pub mod bounds;
pub mod geocode;
mod point;
pub mod projection;
pub mod store;
mod viewport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bounds::{BoundingRegion, BoundsError};
pub use geocode::{GeocodeError, GeocodeResult, Geocoder};
pub use point::{Fields, Point, PointError, field, is_valid_lat_lon};
pub use store::{MemoryPointStore, PointSet, PointStore};
pub use viewport::{MapSettings, MapSize, SettingsError, TileSource, Viewport};
