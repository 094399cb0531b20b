//! Bounding regions over WGS84 coordinates.
//!
//! A [`BoundingRegion`] is the minimal axis-aligned rectangle enclosing a set
//! of coordinates. It does not model regions crossing the antimeridian.

use geo::{BoundingRect, Coord, MultiPoint, Rect};
use thiserror::Error;

/// Rectangle described by its south-west and north-east corners.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimap_core::BoundingRegion;
///
/// let region = BoundingRegion::from_coords([
///     Coord { x: 88.0, y: 27.0 },
///     Coord { x: 89.0, y: 28.0 },
/// ])?;
/// let padded = region.pad(0.25);
///
/// assert_eq!(padded.south(), 26.75);
/// assert_eq!(padded.east(), 89.25);
/// # Ok::<(), poimap_core::BoundsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRegion {
    southwest: Coord<f64>,
    northeast: Coord<f64>,
}

/// Errors returned by [`BoundingRegion::from_coords`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BoundsError {
    /// No coordinates were supplied.
    #[error("cannot bound an empty set of coordinates")]
    Empty,
    /// The coordinates enclose zero area.
    #[error("coordinates span zero area around ({}, {})", .center.y, .center.x)]
    Degenerate {
        /// Centre of the collapsed rectangle.
        center: Coord<f64>,
    },
}

impl BoundingRegion {
    /// Build a region from two opposite corners in any order.
    pub fn new(a: Coord<f64>, b: Coord<f64>) -> Self {
        Self::from(Rect::new(a, b))
    }

    /// Minimal region enclosing `coords`.
    ///
    /// Fails when the input is empty or the result has zero width or height.
    pub fn from_coords<I>(coords: I) -> Result<Self, BoundsError>
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        let points: MultiPoint<f64> = coords.into_iter().collect();
        let rect = points.bounding_rect().ok_or(BoundsError::Empty)?;
        let region = Self::from(rect);
        if region.is_degenerate() {
            return Err(BoundsError::Degenerate {
                center: region.center(),
            });
        }
        Ok(region)
    }

    pub fn southwest(&self) -> Coord<f64> {
        self.southwest
    }

    pub fn northeast(&self) -> Coord<f64> {
        self.northeast
    }

    pub fn south(&self) -> f64 {
        self.southwest.y
    }

    pub fn west(&self) -> f64 {
        self.southwest.x
    }

    pub fn north(&self) -> f64 {
        self.northeast.y
    }

    pub fn east(&self) -> f64 {
        self.northeast.x
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.east() - self.west()
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.north() - self.south()
    }

    /// Whether the region collapses to a line or a point.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.west() + self.east()) / 2.0,
            y: (self.south() + self.north()) / 2.0,
        }
    }

    /// Expand every side by `fraction` of the span along that axis.
    ///
    /// A fraction of `0.25` grows both width and height by half.
    #[must_use]
    pub fn pad(&self, fraction: f64) -> Self {
        let dx = self.width() * fraction;
        let dy = self.height() * fraction;
        Self {
            southwest: Coord {
                x: self.west() - dx,
                y: self.south() - dy,
            },
            northeast: Coord {
                x: self.east() + dx,
                y: self.north() + dy,
            },
        }
    }

    /// Containment test; boundary coordinates count as inside.
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        (self.south()..=self.north()).contains(&coord.y)
            && (self.west()..=self.east()).contains(&coord.x)
    }

    /// Whether `other` lies entirely within this region.
    pub fn contains_region(&self, other: &Self) -> bool {
        self.contains(other.southwest) && self.contains(other.northeast)
    }

    /// Smallest region covering both inputs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            southwest: Coord {
                x: self.west().min(other.west()),
                y: self.south().min(other.south()),
            },
            northeast: Coord {
                x: self.east().max(other.east()),
                y: self.north().max(other.north()),
            },
        }
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(self.southwest, self.northeast)
    }
}

impl From<Rect<f64>> for BoundingRegion {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            southwest: rect.min(),
            northeast: rect.max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn coord(lat: f64, lon: f64) -> Coord<f64> {
        Coord { x: lon, y: lat }
    }

    #[rstest]
    fn empty_input_is_rejected() {
        let err = BoundingRegion::from_coords(Vec::new()).expect_err("empty");
        assert_eq!(err, BoundsError::Empty);
    }

    #[rstest]
    #[case(vec![coord(27.0, 88.0)])]
    #[case(vec![coord(27.0, 88.0), coord(27.0, 88.0), coord(27.0, 88.0)])]
    #[case(vec![coord(27.0, 88.0), coord(27.0, 89.0)])] // shared latitude
    #[case(vec![coord(27.0, 88.0), coord(28.0, 88.0)])] // shared longitude
    fn zero_area_input_is_degenerate(#[case] coords: Vec<Coord<f64>>) {
        let err = BoundingRegion::from_coords(coords).expect_err("degenerate");
        assert!(matches!(err, BoundsError::Degenerate { .. }));
    }

    #[rstest]
    fn corners_are_normalised() {
        let region = BoundingRegion::new(coord(28.0, 89.0), coord(27.0, 88.0));
        assert_eq!(region.southwest(), coord(27.0, 88.0));
        assert_eq!(region.northeast(), coord(28.0, 89.0));
    }

    #[rstest]
    fn padding_expands_each_side() {
        let region = BoundingRegion::new(coord(27.0, 88.0), coord(29.0, 92.0));
        let padded = region.pad(0.25);
        assert_eq!(padded.south(), 26.5);
        assert_eq!(padded.north(), 29.5);
        assert_eq!(padded.west(), 87.0);
        assert_eq!(padded.east(), 93.0);
        assert!(padded.contains_region(&region));
    }

    #[rstest]
    fn union_covers_both() {
        let a = BoundingRegion::new(coord(0.0, 0.0), coord(1.0, 1.0));
        let b = BoundingRegion::new(coord(-1.0, 2.0), coord(0.5, 3.0));
        let joined = a.union(&b);
        assert!(joined.contains_region(&a));
        assert!(joined.contains_region(&b));
    }

    proptest! {
        #[test]
        fn unpadded_region_contains_every_input(
            coords in prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 1..40)
        ) {
            let input: Vec<Coord<f64>> = coords.iter().map(|&(lat, lon)| coord(lat, lon)).collect();
            match BoundingRegion::from_coords(input.clone()) {
                Ok(region) => {
                    for c in &input {
                        prop_assert!(region.contains(*c));
                    }
                    let padded = region.pad(0.25);
                    prop_assert!(padded.contains_region(&region));
                }
                Err(BoundsError::Degenerate { .. }) => {}
                Err(BoundsError::Empty) => prop_assert!(false, "non-empty input"),
            }
        }
    }
}
