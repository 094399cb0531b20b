//! Translate free-text place queries into bounding regions.
//!
//! The [`Geocoder`] trait abstracts the lookup so the map layer never depends
//! on a particular provider. Implementations return candidates ordered by
//! relevance; the search control only ever applies the first one.

mod error;
mod provider;

pub use error::GeocodeError;
pub use provider::{GeocodeResult, Geocoder};
