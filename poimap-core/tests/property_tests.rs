//! Property tests for bounding regions and viewport fitting.

use geo::Coord;
use poimap_core::projection::{fit_region, visible_region};
use poimap_core::{BoundingRegion, BoundsError, MapSettings};
use proptest::prelude::*;

/// Tolerance absorbing projection round-trip error.
const EPSILON: f64 = 1e-9;

fn coord_strategy() -> impl Strategy<Value = Coord<f64>> {
    (-80.0_f64..80.0, -179.0_f64..179.0).prop_map(|(lat, lon)| Coord { x: lon, y: lat })
}

fn within(region: &BoundingRegion, coord: Coord<f64>) -> bool {
    coord.y >= region.south() - EPSILON
        && coord.y <= region.north() + EPSILON
        && coord.x >= region.west() - EPSILON
        && coord.x <= region.east() + EPSILON
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn region_contains_every_input(coords in prop::collection::vec(coord_strategy(), 1..40)) {
        match BoundingRegion::from_coords(coords.iter().copied()) {
            Ok(region) => {
                prop_assert!(coords.iter().all(|c| region.contains(*c)));
                prop_assert!(!region.is_degenerate());
            }
            Err(BoundsError::Degenerate { .. }) => {
                let first = coords[0];
                prop_assert!(
                    coords.iter().all(|c| c.x == first.x) || coords.iter().all(|c| c.y == first.y)
                );
            }
            Err(BoundsError::Empty) => prop_assert!(false, "non-empty input reported empty"),
        }
    }

    #[test]
    fn padding_only_grows(coords in prop::collection::vec(coord_strategy(), 2..20), fraction in 0.0_f64..1.0) {
        if let Ok(region) = BoundingRegion::from_coords(coords) {
            prop_assert!(region.pad(fraction).contains_region(&region));
        }
    }

    #[test]
    fn fitted_viewport_shows_whole_region(a in coord_strategy(), b in coord_strategy()) {
        let region = BoundingRegion::new(a, b);
        prop_assume!(!region.is_degenerate());
        let settings = MapSettings::default();

        let viewport = fit_region(&region, &settings);
        let visible = visible_region(&viewport, &settings);

        prop_assert!(within(&visible, region.southwest()));
        prop_assert!(within(&visible, region.northeast()));
        prop_assert_eq!(fit_region(&region, &settings), viewport);
    }
}
