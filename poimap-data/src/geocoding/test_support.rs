//! Deterministic [`Geocoder`] double that never touches the network.

use poimap_core::{GeocodeError, GeocodeResult, Geocoder};

/// Stub `Geocoder` returning a pre-configured answer.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use poimap_core::{BoundingRegion, GeocodeError, GeocodeResult, Geocoder};
/// use poimap_data::geocoding::test_support::StubGeocoder;
///
/// let bbox = BoundingRegion::new(Coord { x: 88.5, y: 27.2 }, Coord { x: 88.7, y: 27.4 });
/// let geocoder = StubGeocoder::with_results(vec![GeocodeResult {
///     name: "Gangtok".into(),
///     center: bbox.center(),
///     bbox,
/// }]);
///
/// assert_eq!(geocoder.geocode("anything").map(|r| r.len()), Ok(1));
/// assert_eq!(geocoder.geocode(" "), Err(GeocodeError::EmptyQuery));
/// ```
#[derive(Debug, Clone)]
pub struct StubGeocoder {
    response: StubResponse,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Results(Vec<GeocodeResult>),
    Error(GeocodeError),
}

impl StubGeocoder {
    /// Answer every non-blank query with `results`.
    #[must_use]
    pub fn with_results(results: Vec<GeocodeResult>) -> Self {
        Self {
            response: StubResponse::Results(results),
        }
    }

    /// Fail every non-blank query with `error`. Blank queries still return
    /// [`GeocodeError::EmptyQuery`].
    #[must_use]
    pub fn with_error(error: GeocodeError) -> Self {
        Self {
            response: StubResponse::Error(error),
        }
    }

    /// Provider that finds nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_results(Vec::new())
    }
}

impl Geocoder for StubGeocoder {
    fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
        if query.trim().is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        match &self.response {
            StubResponse::Results(results) => Ok(results.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn with_error_returns_configured_error() {
        let geocoder = StubGeocoder::with_error(GeocodeError::NetworkError {
            url: "http://example.com".to_owned(),
            message: "connection refused".to_owned(),
        });
        let err = geocoder.geocode("Gangtok").expect_err("should fail");
        assert!(matches!(err, GeocodeError::NetworkError { .. }));
    }

    #[rstest]
    fn empty_finds_nothing() {
        assert_eq!(StubGeocoder::empty().geocode("Gangtok"), Ok(Vec::new()));
    }
}
