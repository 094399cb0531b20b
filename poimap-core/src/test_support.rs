//! Test-only fixtures shared by unit and behaviour tests.

use geo::Coord;

use crate::{BoundingRegion, GeocodeError, GeocodeResult, Geocoder, Point, field};

/// Point with a generated name and no auxiliary fields.
pub fn point_at(id: u64, lat: f64, lon: f64) -> Point {
    Point::from_lat_lon(id, format!("Point {id}"), lat, lon)
}

/// Six valid points spread across Sikkim with full display fields.
pub fn sample_points() -> Vec<Point> {
    [
        (1, "Rumtek", 27.3258, 88.6012),
        (2, "Pemayangtse", 27.304_53, 88.252_04),
        (3, "Tashiding", 27.274, 88.287),
        (4, "Enchey", 27.3381, 88.6132),
        (5, "Ralang", 27.1675, 88.6622),
        (6, "Phodong", 27.428, 88.613),
    ]
    .into_iter()
    .map(|(id, name, lat, lon)| {
        Point::from_lat_lon(id, format!("{name} Monastery"), lat, lon)
            .with_field(field::DESCRIPTION, format!("About {name}"))
            .with_field(field::VISITING, "Open: 9 AM - 5 PM")
            .with_field(field::LINK, "https://www.sikkimtourism.gov.in/")
            .with_field(field::IMAGE, format!("/{}.jpg", name.to_lowercase()))
            .with_field(field::TOWN, name)
    })
    .collect()
}

/// `Geocoder` answering every non-blank query with the same region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedGeocoder {
    pub bbox: BoundingRegion,
}

impl FixedGeocoder {
    pub fn new(south_west: Coord<f64>, north_east: Coord<f64>) -> Self {
        Self {
            bbox: BoundingRegion::new(south_west, north_east),
        }
    }
}

impl Geocoder for FixedGeocoder {
    fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
        if query.trim().is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        Ok(vec![GeocodeResult {
            name: query.to_owned(),
            center: self.bbox.center(),
            bbox: self.bbox,
        }])
    }
}
