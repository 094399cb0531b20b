//! Spherical Web Mercator projection into world pixel space.
//!
//! World pixels grow rightwards and downwards from the north-west corner of
//! the world. At zoom `z` the world is `tile_size * 2^z` pixels square.

use std::f64::consts::PI;

use geo::Coord;

use crate::{BoundingRegion, MapSettings, Viewport};

/// Latitude beyond which Web Mercator diverges.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Edge length of the world in pixels at `zoom`.
pub fn world_size(zoom: u8, tile_size: u32) -> f64 {
    f64::from(tile_size) * 2_f64.powi(i32::from(zoom))
}

/// Project a geographic coordinate to world pixels.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimap_core::projection::project;
///
/// let origin = project(Coord { x: 0.0, y: 0.0 }, 0, 256);
/// assert!((origin.x - 128.0).abs() < 1e-9);
/// assert!((origin.y - 128.0).abs() < 1e-9);
/// ```
pub fn project(coord: Coord<f64>, zoom: u8, tile_size: u32) -> Coord<f64> {
    let size = world_size(zoom, tile_size);
    let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = lat.to_radians().sin();
    Coord {
        x: (coord.x + 180.0) / 360.0 * size,
        y: (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * size,
    }
}

/// Inverse of [`project`].
pub fn unproject(pixel: Coord<f64>, zoom: u8, tile_size: u32) -> Coord<f64> {
    let size = world_size(zoom, tile_size);
    let n = PI - 2.0 * PI * pixel.y / size;
    Coord {
        x: pixel.x / size * 360.0 - 180.0,
        y: n.sinh().atan().to_degrees(),
    }
}

/// Largest zoom in the configured range at which `region` fits the map.
///
/// Falls back to the minimum zoom when even that is too small.
pub fn bounds_zoom(region: &BoundingRegion, settings: &MapSettings) -> u8 {
    let width = f64::from(settings.size.width);
    let height = f64::from(settings.size.height);
    (settings.min_zoom..=settings.max_zoom)
        .rev()
        .find(|&zoom| {
            let sw = project(region.southwest(), zoom, settings.tile_size);
            let ne = project(region.northeast(), zoom, settings.tile_size);
            (ne.x - sw.x).abs() <= width && (sw.y - ne.y).abs() <= height
        })
        .unwrap_or(settings.min_zoom)
}

/// Viewport showing the whole of `region`.
///
/// The centre is the midpoint of the projected corners, which differs from
/// the geographic midpoint away from the equator.
pub fn fit_region(region: &BoundingRegion, settings: &MapSettings) -> Viewport {
    let zoom = bounds_zoom(region, settings);
    let sw = project(region.southwest(), zoom, settings.tile_size);
    let ne = project(region.northeast(), zoom, settings.tile_size);
    let mid = Coord {
        x: (sw.x + ne.x) / 2.0,
        y: (sw.y + ne.y) / 2.0,
    };
    Viewport::new(unproject(mid, zoom, settings.tile_size), zoom)
}

/// Geographic region covered by `viewport` on a map of the configured size.
pub fn visible_region(viewport: &Viewport, settings: &MapSettings) -> BoundingRegion {
    let center = project(viewport.center, viewport.zoom, settings.tile_size);
    let half_w = f64::from(settings.size.width) / 2.0;
    let half_h = f64::from(settings.size.height) / 2.0;
    let nw = unproject(
        Coord {
            x: center.x - half_w,
            y: center.y - half_h,
        },
        viewport.zoom,
        settings.tile_size,
    );
    let se = unproject(
        Coord {
            x: center.x + half_w,
            y: center.y + half_h,
        },
        viewport.zoom,
        settings.tile_size,
    );
    BoundingRegion::new(nw, se)
}
