//! HTTP geocoding against the Nominatim search API.
//!
//! [`NominatimGeocoder`] implements the synchronous
//! [`poimap_core::Geocoder`] trait by blocking on an async `reqwest` call
//! inside a runtime it owns, so the map layer can stay free of async code.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use poimap_core::Geocoder;
//! use poimap_data::geocoding::{NominatimConfig, NominatimGeocoder};
//!
//! let config = NominatimConfig::default()
//!     .with_timeout(Duration::from_secs(5))
//!     .with_user_agent("monastery-map/1.0");
//! let geocoder = NominatimGeocoder::with_config(config)?;
//!
//! let places = geocoder.geocode("Gangtok")?;
//! println!("{:?}", places.first().map(|place| place.bbox));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod nominatim;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, GeocoderBuildError, NominatimConfig, NominatimGeocoder,
};
