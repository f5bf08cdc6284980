use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::projection::Crs;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "LatLngRepr")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LatLngRepr {
    Pair([f64; 2]),
    Object { lat: f64, lng: f64 },
}

impl From<LatLngRepr> for LatLng {
    fn from(repr: LatLngRepr) -> Self {
        match repr {
            LatLngRepr::Pair([lat, lng]) => Self { lat, lng },
            LatLngRepr::Object { lat, lng } => Self { lat, lng },
        }
    }
}

/// A map layer that a connector can be anchored to.
///
/// Only points, circles, circle markers and square shape markers can be
/// connected; the remaining variants exist so that scenes containing them
/// can be read and then rejected with a precise error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "GeometryRepr")]
pub enum Geometry {
    /// Bare coordinate list. A point when it has exactly two entries.
    Coordinates(Vec<f64>),
    /// Coordinate object (`{ "lat": .., "lng": .. }`).
    LatLng(LatLng),
    /// Circle with a radius in metres.
    Circle { center: LatLng, radius: f64 },
    /// Circle with a fixed radius in pixels.
    CircleMarker { center: LatLng, radius: f64 },
    /// Marker of a named shape; `radius` is half the side length in pixels.
    ShapeMarker {
        center: LatLng,
        radius: f64,
        shape: String,
    },
    Polyline(Vec<LatLng>),
    Polygon(Vec<LatLng>),
}

impl Geometry {
    pub fn point(lat: f64, lng: f64) -> Self {
        Self::Coordinates(vec![lat, lng])
    }

    pub fn circle(center: LatLng, radius: f64) -> Self {
        Self::Circle { center, radius }
    }

    pub fn circle_marker(center: LatLng, radius: f64) -> Self {
        Self::CircleMarker { center, radius }
    }

    pub fn square(center: LatLng, radius: f64) -> Self {
        Self::ShapeMarker {
            center,
            radius,
            shape: SQUARE_SHAPE.to_string(),
        }
    }

    /// Geographic position the layer is drawn around, if it has a single one.
    pub fn center(&self) -> Option<LatLng> {
        match self {
            Geometry::Coordinates(coords) => match coords.as_slice() {
                [lat, lng] => Some(LatLng::new(*lat, *lng)),
                _ => None,
            },
            Geometry::LatLng(latlng) => Some(*latlng),
            Geometry::Circle { center, .. }
            | Geometry::CircleMarker { center, .. }
            | Geometry::ShapeMarker { center, .. } => Some(*center),
            Geometry::Polyline(_) | Geometry::Polygon(_) => None,
        }
    }

    /// Short human readable name used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Geometry::Coordinates(coords) => format!("coordinates[{}]", coords.len()),
            Geometry::LatLng(_) => "latlng".to_string(),
            Geometry::Circle { .. } => "circle".to_string(),
            Geometry::CircleMarker { .. } => "circleMarker".to_string(),
            Geometry::ShapeMarker { shape, .. } => format!("shapeMarker({shape})"),
            Geometry::Polyline(_) => "polyline".to_string(),
            Geometry::Polygon(_) => "polygon".to_string(),
        }
    }
}

pub const SQUARE_SHAPE: &str = "square";

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum GeometryRepr {
    Coordinates(Vec<f64>),
    LatLng { lat: f64, lng: f64 },
    Layer(LayerRepr),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum LayerRepr {
    Circle {
        center: LatLng,
        radius: f64,
    },
    CircleMarker {
        center: LatLng,
        radius: f64,
    },
    ShapeMarker {
        center: LatLng,
        radius: f64,
        shape: String,
    },
    Polyline {
        latlngs: Vec<LatLng>,
    },
    Polygon {
        latlngs: Vec<LatLng>,
    },
}

impl From<GeometryRepr> for Geometry {
    fn from(repr: GeometryRepr) -> Self {
        match repr {
            GeometryRepr::Coordinates(coords) => Geometry::Coordinates(coords),
            GeometryRepr::LatLng { lat, lng } => Geometry::LatLng(LatLng::new(lat, lng)),
            GeometryRepr::Layer(layer) => match layer {
                LayerRepr::Circle { center, radius } => Geometry::Circle { center, radius },
                LayerRepr::CircleMarker { center, radius } => {
                    Geometry::CircleMarker { center, radius }
                }
                LayerRepr::ShapeMarker {
                    center,
                    radius,
                    shape,
                } => Geometry::ShapeMarker {
                    center,
                    radius,
                    shape,
                },
                LayerRepr::Polyline { latlngs } => Geometry::Polyline(latlngs),
                LayerRepr::Polygon { latlngs } => Geometry::Polygon(latlngs),
            },
        }
    }
}

impl Serialize for LatLng {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.lat, self.lng].serialize(serializer)
    }
}

/// Path styling forwarded untouched to the renderer.
///
/// Known Leaflet path options get typed fields; anything else is kept in
/// `extra` and emitted as a raw SVG attribute.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: Option<String>,
    pub weight: Option<f64>,
    pub opacity: Option<f64>,
    pub dash_array: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(flatten)]
    pub geometry: LayerGeometry,
}

/// Wrapper so a layer can be written either as `{"id", "geometry": ..}` or
/// with the geometry fields inline next to the id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LayerGeometry {
    Nested { geometry: Geometry },
    Inline(Geometry),
}

impl LayerGeometry {
    pub fn geometry(&self) -> &Geometry {
        match self {
            LayerGeometry::Nested { geometry } | LayerGeometry::Inline(geometry) => geometry,
        }
    }
}

impl Layer {
    pub fn new(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            geometry: LayerGeometry::Nested { geometry },
        }
    }

    pub fn geometry(&self) -> &Geometry {
        self.geometry.geometry()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConnectorSpec {
    /// Layer ids; the first one is the origin.
    pub anchors: Vec<String>,
    #[serde(default)]
    pub style: PathStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOverride {
    pub crs: Option<Crs>,
    pub center: Option<LatLng>,
    pub zoom: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub view: Option<ViewOverride>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub connectors: Vec<ConnectorSpec>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Adds a layer and returns its id.
    pub fn push_layer(&mut self, id: impl Into<String>, geometry: Geometry) -> String {
        let layer = Layer::new(id, geometry);
        let id = layer.id.clone();
        self.layers.push(layer);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_point_forms() {
        let pair: Geometry = serde_json::from_str("[51.5, -0.09]").unwrap();
        assert_eq!(pair, Geometry::point(51.5, -0.09));
        let object: Geometry = serde_json::from_str(r#"{"lat": 1.0, "lng": 2.0}"#).unwrap();
        assert_eq!(object, Geometry::LatLng(LatLng::new(1.0, 2.0)));
        assert_eq!(object.center(), Some(LatLng::new(1.0, 2.0)));
    }

    #[test]
    fn reads_tagged_layers() {
        let circle: Geometry =
            serde_json::from_str(r#"{"type": "circle", "center": [1, 2], "radius": 30}"#).unwrap();
        assert_eq!(circle, Geometry::circle(LatLng::new(1.0, 2.0), 30.0));

        let square: Geometry = serde_json::from_str(
            r#"{"type": "shapeMarker", "center": {"lat": 0, "lng": 0}, "radius": 8, "shape": "square"}"#,
        )
        .unwrap();
        assert_eq!(square, Geometry::square(LatLng::new(0.0, 0.0), 8.0));

        let line: Geometry =
            serde_json::from_str(r#"{"type": "polyline", "latlngs": [[0, 0], [1, 1]]}"#).unwrap();
        assert_eq!(line.center(), None);
    }

    #[test]
    fn three_coordinates_have_no_center() {
        let raw: Geometry = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(raw.center(), None);
        assert_eq!(raw.type_name(), "coordinates[3]");
    }

    #[test]
    fn layer_accepts_inline_geometry() {
        let layer: Layer = serde_json::from_str(
            r#"{"id": "a", "type": "circleMarker", "center": [0, 0], "radius": 5}"#,
        )
        .unwrap();
        assert_eq!(
            layer.geometry(),
            &Geometry::circle_marker(LatLng::new(0.0, 0.0), 5.0)
        );
    }

    #[test]
    fn path_style_keeps_unknown_keys() {
        let style: PathStyle =
            serde_json::from_str(r##"{"color": "#f00", "lineCap": "round"}"##).unwrap();
        assert_eq!(style.color.as_deref(), Some("#f00"));
        assert_eq!(
            style.extra.get("lineCap").and_then(|v| v.as_str()),
            Some("round")
        );
    }
}
