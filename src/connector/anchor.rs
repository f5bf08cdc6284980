use crate::geometry::{AnchorKind, Point, Shape, boundary_points, classify, normalize, vector_between};
use crate::ir::Geometry;
use crate::projection::Projector;

use super::ConnectorError;

/// One shape taking part in a connector.
///
/// The geometry is borrowed from the caller. Everything else is derived
/// state refreshed on each update: the projected shape and the direction
/// toward the origin.
#[derive(Debug, Clone, Copy)]
pub struct Anchor<'g> {
    is_origin: bool,
    kind: AnchorKind,
    geometry: &'g Geometry,
    shape: Option<Shape>,
    vector: Option<Point>,
    normalized_vector: Option<Point>,
}

impl<'g> Anchor<'g> {
    pub fn new(geometry: &'g Geometry, is_origin: bool) -> Result<Self, ConnectorError> {
        let kind = classify(geometry)?;
        Ok(Self {
            is_origin,
            kind,
            geometry,
            shape: None,
            vector: None,
            normalized_vector: None,
        })
    }

    pub fn is_origin(&self) -> bool {
        self.is_origin
    }

    pub fn kind(&self) -> AnchorKind {
        self.kind
    }

    /// Projected shape from the last update.
    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn center(&self) -> Option<Point> {
        self.shape.map(|shape| shape.center())
    }

    /// Raw vector from this anchor's centre to the origin's centre.
    pub fn vector(&self) -> Option<Point> {
        self.vector
    }

    pub fn normalized_vector(&self) -> Option<Point> {
        self.normalized_vector
    }

    /// Refreshes the cached layer-space shape.
    pub(crate) fn project<P: Projector + ?Sized>(
        &mut self,
        projector: &P,
    ) -> Result<Shape, ConnectorError> {
        let shape = resolve_shape(self.kind, self.geometry, projector)?;
        self.shape = Some(shape);
        Ok(shape)
    }

    pub(crate) fn set_vector(&mut self, origin_center: Point) -> Result<(), ConnectorError> {
        let center = self.require_shape()?.center();
        let vector = vector_between(origin_center, center);
        self.vector = Some(vector);
        self.normalized_vector = Some(normalize(vector));
        Ok(())
    }

    /// Copy of this anchor pointing along `normalized_vector` instead.
    pub(crate) fn oriented(&self, normalized_vector: Point) -> Self {
        Self {
            normalized_vector: Some(normalized_vector),
            ..*self
        }
    }

    /// Candidate boundary points of this anchor toward `other`.
    pub fn boundary_points(&self, other: &Anchor<'_>) -> Result<Vec<Point>, ConnectorError> {
        let shape = self.require_shape()?;
        let other_center = other.require_shape()?.center();
        let direction = self.normalized_vector.ok_or_else(|| self.invariant("no direction"))?;
        Ok(boundary_points(&shape, direction, other_center))
    }

    fn require_shape(&self) -> Result<Shape, ConnectorError> {
        self.shape.ok_or_else(|| self.invariant("not projected"))
    }

    fn invariant(&self, reason: &str) -> ConnectorError {
        ConnectorError::UnsupportedGeometry {
            kind: format!("{} ({reason})", self.kind),
        }
    }
}

fn resolve_shape<P: Projector + ?Sized>(
    kind: AnchorKind,
    geometry: &Geometry,
    projector: &P,
) -> Result<Shape, ConnectorError> {
    let mismatch = || ConnectorError::UnsupportedGeometry {
        kind: format!("{} as {kind}", geometry.type_name()),
    };
    let center = geometry.center().ok_or_else(mismatch)?;
    let center_px = projector.latlng_to_layer_point(center);
    let shape = match (kind, geometry) {
        (AnchorKind::Point, Geometry::Coordinates(_) | Geometry::LatLng(_)) => {
            Shape::Point(center_px)
        }
        (AnchorKind::Circle, Geometry::Circle { radius, .. }) => Shape::Circle {
            center: center_px,
            radius: checked_radius(kind, projector.circle_radius(center, *radius))?,
        },
        (AnchorKind::CircleMarker, Geometry::CircleMarker { radius, .. }) => Shape::Circle {
            center: center_px,
            radius: checked_radius(kind, *radius)?,
        },
        (AnchorKind::Square, Geometry::ShapeMarker { radius, .. }) => Shape::Square {
            center: center_px,
            half_side: checked_radius(kind, *radius)?,
        },
        _ => return Err(mismatch()),
    };
    Ok(shape)
}

fn checked_radius(kind: AnchorKind, radius: f64) -> Result<f64, ConnectorError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(radius)
    } else {
        Err(ConnectorError::InvalidRadius {
            kind: kind.to_string(),
            radius,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::LatLng;
    use crate::projection::Planar;

    #[test]
    fn new_classifies_geometry() {
        let geometry = Geometry::circle_marker(LatLng::new(0.0, 0.0), 4.0);
        let anchor = Anchor::new(&geometry, true).unwrap();
        assert!(anchor.is_origin());
        assert_eq!(anchor.kind(), AnchorKind::CircleMarker);
        assert!(anchor.center().is_none());
    }

    #[test]
    fn projection_resolves_radius() {
        let geometry = Geometry::circle(LatLng::new(10.0, 20.0), 7.0);
        let mut anchor = Anchor::new(&geometry, false).unwrap();
        let shape = anchor.project(&Planar).unwrap();
        assert_eq!(
            shape,
            Shape::Circle {
                center: Point::new(20.0, 10.0),
                radius: 7.0
            }
        );
    }

    #[test]
    fn vector_points_at_origin() {
        let geometry = Geometry::point(0.0, 10.0);
        let mut anchor = Anchor::new(&geometry, false).unwrap();
        anchor.project(&Planar).unwrap();
        anchor.set_vector(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(anchor.vector(), Some(Point::new(-10.0, 0.0)));
        assert_eq!(anchor.normalized_vector(), Some(Point::new(-1.0, 0.0)));
    }

    #[test]
    fn oriented_copy_leaves_original_alone() {
        let geometry = Geometry::point(0.0, 10.0);
        let mut anchor = Anchor::new(&geometry, false).unwrap();
        anchor.project(&Planar).unwrap();
        anchor.set_vector(Point::ZERO).unwrap();
        let flipped = anchor.oriented(Point::new(1.0, 0.0));
        assert_eq!(flipped.normalized_vector(), Some(Point::new(1.0, 0.0)));
        assert_eq!(anchor.normalized_vector(), Some(Point::new(-1.0, 0.0)));
    }

    #[test]
    fn bad_radii_are_rejected_at_projection() {
        let center = LatLng::new(0.0, 100.0);
        for geometry in [
            Geometry::square(center, f64::NAN),
            Geometry::square(center, -1e-10),
            Geometry::circle_marker(center, f64::INFINITY),
            Geometry::circle(center, -5.0),
        ] {
            let mut anchor = Anchor::new(&geometry, false).unwrap();
            let err = anchor.project(&Planar).unwrap_err();
            assert!(
                matches!(err, ConnectorError::InvalidRadius { .. }),
                "{geometry:?}: {err}"
            );
            assert!(anchor.shape().is_none());
        }
    }

    #[test]
    fn zero_radius_is_allowed() {
        let geometry = Geometry::square(LatLng::new(0.0, 0.0), 0.0);
        let mut anchor = Anchor::new(&geometry, false).unwrap();
        assert!(anchor.project(&Planar).is_ok());
    }

    #[test]
    fn boundary_before_projection_is_an_error() {
        let geometry = Geometry::point(0.0, 0.0);
        let anchor = Anchor::new(&geometry, true).unwrap();
        let err = anchor.boundary_points(&anchor).unwrap_err();
        assert!(matches!(err, ConnectorError::UnsupportedGeometry { .. }));
    }
}
