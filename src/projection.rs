//! Geographic to layer-space projection.
//!
//! The connector core never projects anything itself; it asks a
//! [`Projector`] for screen positions on every update.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::geometry::Point;
use crate::ir::LatLng;

pub const EARTH_RADIUS: f64 = 6_378_137.0;
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;
pub const DEFAULT_TILE_SIZE: f64 = 256.0;

/// Supplies layer-space (pixel) positions for geographic coordinates.
pub trait Projector {
    fn latlng_to_layer_point(&self, latlng: LatLng) -> Point;

    /// Radius in pixels of a circle of `metres` around `center`.
    fn circle_radius(&self, center: LatLng, metres: f64) -> f64;
}

impl<P: Projector + ?Sized> Projector for &P {
    fn latlng_to_layer_point(&self, latlng: LatLng) -> Point {
        (**self).latlng_to_layer_point(latlng)
    }

    fn circle_radius(&self, center: LatLng, metres: f64) -> f64 {
        (**self).circle_radius(center, metres)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Crs {
    #[default]
    WebMercator,
    /// Coordinates are already in pixels: `x = lng`, `y = lat`.
    Planar,
}

/// Spherical mercator (EPSG:3857) at a fixed zoom, with the view centre
/// placed in the middle of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    zoom: f64,
    tile_size: f64,
    pixel_origin: Point,
}

impl WebMercator {
    pub fn new(center: LatLng, zoom: f64, tile_size: f64, viewport: (f64, f64)) -> Self {
        let mut projection = Self {
            zoom,
            tile_size,
            pixel_origin: Point::ZERO,
        };
        let center_px = projection.world_point(center);
        projection.pixel_origin = center_px - Point::new(viewport.0 / 2.0, viewport.1 / 2.0);
        projection
    }

    fn scale(&self) -> f64 {
        self.tile_size * 2f64.powf(self.zoom)
    }

    /// Pixel position on the whole-world plane at the current zoom.
    fn world_point(&self, latlng: LatLng) -> Point {
        let projected = project_metres(latlng);
        let k = 0.5 / (PI * EARTH_RADIUS);
        let scale = self.scale();
        Point::new(
            scale * (k * projected.x + 0.5),
            scale * (-k * projected.y + 0.5),
        )
    }
}

impl Projector for WebMercator {
    fn latlng_to_layer_point(&self, latlng: LatLng) -> Point {
        self.world_point(latlng) - self.pixel_origin
    }

    fn circle_radius(&self, center: LatLng, metres: f64) -> f64 {
        let lat = center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let metres_per_pixel = 2.0 * PI * EARTH_RADIUS * lat.cos() / self.scale();
        metres / metres_per_pixel
    }
}

/// Spherical mercator in metres.
fn project_metres(latlng: LatLng) -> Point {
    let lat = latlng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = lat.to_radians().sin();
    Point::new(
        EARTH_RADIUS * latlng.lng.to_radians(),
        EARTH_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0,
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Planar;

impl Projector for Planar {
    fn latlng_to_layer_point(&self, latlng: LatLng) -> Point {
        Point::new(latlng.lng, latlng.lat)
    }

    fn circle_radius(&self, _center: LatLng, metres: f64) -> f64 {
        metres
    }
}

/// The projector selected by a view's [`Crs`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapProjector {
    WebMercator(WebMercator),
    Planar(Planar),
}

impl Projector for MapProjector {
    fn latlng_to_layer_point(&self, latlng: LatLng) -> Point {
        match self {
            MapProjector::WebMercator(p) => p.latlng_to_layer_point(latlng),
            MapProjector::Planar(p) => p.latlng_to_layer_point(latlng),
        }
    }

    fn circle_radius(&self, center: LatLng, metres: f64) -> f64 {
        match self {
            MapProjector::WebMercator(p) => p.circle_radius(center, metres),
            MapProjector::Planar(p) => p.circle_radius(center, metres),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_is_identity() {
        let p = Planar.latlng_to_layer_point(LatLng::new(50.0, 150.0));
        assert_eq!(p, Point::new(150.0, 50.0));
        assert_eq!(Planar.circle_radius(LatLng::new(0.0, 0.0), 12.0), 12.0);
    }

    #[test]
    fn mercator_centers_the_view() {
        let center = LatLng::new(51.505, -0.09);
        let projection = WebMercator::new(center, 13.0, DEFAULT_TILE_SIZE, (800.0, 600.0));
        let p = projection.latlng_to_layer_point(center);
        assert!((p.x - 400.0).abs() < 1e-6);
        assert!((p.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn mercator_north_is_up() {
        let center = LatLng::new(0.0, 0.0);
        let projection = WebMercator::new(center, 2.0, DEFAULT_TILE_SIZE, (512.0, 512.0));
        let north = projection.latlng_to_layer_point(LatLng::new(10.0, 0.0));
        let east = projection.latlng_to_layer_point(LatLng::new(0.0, 10.0));
        assert!(north.y < 256.0);
        assert!(east.x > 256.0);
    }

    #[test]
    fn circle_radius_grows_with_zoom() {
        let center = LatLng::new(0.0, 0.0);
        let low = WebMercator::new(center, 10.0, DEFAULT_TILE_SIZE, (100.0, 100.0));
        let high = WebMercator::new(center, 11.0, DEFAULT_TILE_SIZE, (100.0, 100.0));
        let r_low = low.circle_radius(center, 1000.0);
        let r_high = high.circle_radius(center, 1000.0);
        assert!((r_high / r_low - 2.0).abs() < 1e-9);
    }
}
