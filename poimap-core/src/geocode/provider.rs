use geo::Coord;

use super::GeocodeError;
use crate::BoundingRegion;

/// One candidate returned by a [`Geocoder`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Human-readable label, e.g. `"Gangtok, Sikkim, India"`.
    pub name: String,
    /// Representative point of the place.
    pub center: Coord<f64>,
    /// Extent of the place as reported by the provider.
    pub bbox: BoundingRegion,
}

/// Resolve a free-text query into candidate places.
///
/// Implementations must return [`GeocodeError::EmptyQuery`] for blank
/// queries rather than contacting the provider. An empty `Vec` means the
/// provider answered but found nothing.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use poimap_core::{BoundingRegion, GeocodeError, GeocodeResult, Geocoder};
///
/// struct Fixed;
///
/// impl Geocoder for Fixed {
///     fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
///         if query.trim().is_empty() {
///             return Err(GeocodeError::EmptyQuery);
///         }
///         let bbox = BoundingRegion::new(Coord { x: 88.5, y: 27.2 }, Coord { x: 88.7, y: 27.4 });
///         Ok(vec![GeocodeResult { name: query.to_owned(), center: bbox.center(), bbox }])
///     }
/// }
///
/// assert_eq!(Fixed.geocode("Gangtok").map(|r| r.len()), Ok(1));
/// assert_eq!(Fixed.geocode("  "), Err(GeocodeError::EmptyQuery));
/// ```
pub trait Geocoder {
    /// Look up `query`, returning candidates ordered by relevance.
    fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocodeError>;
}
