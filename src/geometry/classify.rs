use serde::Serialize;
use std::fmt;

use crate::connector::ConnectorError;
use crate::ir::{Geometry, SQUARE_SHAPE};

/// The closed set of shapes a connector can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorKind {
    Point,
    Circle,
    CircleMarker,
    Square,
}

impl AnchorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnchorKind::Point => "point",
            AnchorKind::Circle => "circle",
            AnchorKind::CircleMarker => "circle-marker",
            AnchorKind::Square => "square",
        }
    }
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a geometry descriptor to its anchor kind.
///
/// Looks only at the descriptor's variant and shape tag, never at its
/// position.
pub fn classify(geometry: &Geometry) -> Result<AnchorKind, ConnectorError> {
    match geometry {
        Geometry::ShapeMarker { shape, .. } if shape == SQUARE_SHAPE => Ok(AnchorKind::Square),
        Geometry::Circle { .. } => Ok(AnchorKind::Circle),
        Geometry::CircleMarker { .. } => Ok(AnchorKind::CircleMarker),
        Geometry::LatLng(_) => Ok(AnchorKind::Point),
        Geometry::Coordinates(coords) if coords.len() == 2 => Ok(AnchorKind::Point),
        other => Err(ConnectorError::UnsupportedGeometry {
            kind: other.type_name(),
        }),
    }
}
