//! Response types for the Nominatim `/search` endpoint with `format=json`.
//!
//! Nominatim encodes every number as a string. `boundingbox` is ordered
//! `[south, north, west, east]`.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use geo::Coord;
use poimap_core::{BoundingRegion, GeocodeError, GeocodeResult};
use serde::Deserialize;

/// One entry of a search response.
#[derive(Debug, Deserialize)]
pub struct Place {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    pub boundingbox: [String; 4],
}

fn parse_number(value: &str, what: &str) -> Result<f64, GeocodeError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocodeError::ParseError {
            message: format!("invalid {what} {value:?} in geocoder response"),
        })
}

impl Place {
    pub fn into_result(self) -> Result<GeocodeResult, GeocodeError> {
        let [south, north, west, east] = &self.boundingbox;
        let south = parse_number(south, "south bound")?;
        let north = parse_number(north, "north bound")?;
        let west = parse_number(west, "west bound")?;
        let east = parse_number(east, "east bound")?;
        let center = Coord {
            x: parse_number(&self.lon, "longitude")?,
            y: parse_number(&self.lat, "latitude")?,
        };
        Ok(GeocodeResult {
            name: self.display_name,
            center,
            bbox: BoundingRegion::new(Coord { x: west, y: south }, Coord { x: east, y: north }),
        })
    }
}
