//! Connectors: lines from the outline of an origin shape to the outlines of
//! one or more target shapes.

mod anchor;
mod assembly;
mod error;

pub use anchor::Anchor;
pub use assembly::{Segment, closest_pair};
pub use error::ConnectorError;

use crate::geometry::Point;
use crate::ir::{Geometry, PathStyle};
use crate::projection::Projector;

/// An origin anchor joined to every other anchor by a straight segment.
///
/// Geometries are borrowed, so the connector cannot outlive the layers it
/// is attached to. Segments are recomputed from scratch by [`update`].
///
/// [`update`]: Connector::update
#[derive(Debug, Clone)]
pub struct Connector<'g> {
    anchors: Vec<Anchor<'g>>,
    style: PathStyle,
    segments: Vec<Segment>,
    omitted: Vec<usize>,
}

impl<'g> Connector<'g> {
    /// Builds a connector; the first geometry is the origin.
    pub fn new<I>(geometries: I, style: PathStyle) -> Result<Self, ConnectorError>
    where
        I: IntoIterator<Item = &'g Geometry>,
    {
        let anchors = geometries
            .into_iter()
            .enumerate()
            .map(|(idx, geometry)| Anchor::new(geometry, idx == 0))
            .collect::<Result<Vec<_>, _>>()?;
        if anchors.len() < 2 {
            return Err(ConnectorError::InsufficientPoints {
                count: anchors.len(),
            });
        }
        Ok(Self {
            anchors,
            style,
            segments: Vec::new(),
            omitted: Vec::new(),
        })
    }

    /// Connector between exactly two geometries.
    pub fn pair(
        origin: &'g Geometry,
        target: &'g Geometry,
        style: PathStyle,
    ) -> Result<Self, ConnectorError> {
        Self::new([origin, target], style)
    }

    pub fn anchors(&self) -> &[Anchor<'g>] {
        &self.anchors
    }

    pub fn origin(&self) -> &Anchor<'g> {
        &self.anchors[0]
    }

    pub fn style(&self) -> &PathStyle {
        &self.style
    }

    /// Segments from the last update, in anchor order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Indices of anchors skipped by the last update.
    pub fn omitted(&self) -> &[usize] {
        &self.omitted
    }

    /// Re-projects every anchor and recomputes all segments.
    ///
    /// Calling this twice with the same projector gives the same result.
    pub fn update<P: Projector + ?Sized>(
        &mut self,
        projector: &P,
    ) -> Result<&[Segment], ConnectorError> {
        for anchor in &mut self.anchors {
            anchor.project(projector)?;
        }
        self.calculate_anchor_vectors()?;

        let assembly = assembly::assemble(&self.anchors)?;
        self.segments = assembly.segments;
        self.omitted = assembly.omitted;
        Ok(&self.segments)
    }

    fn calculate_anchor_vectors(&mut self) -> Result<(), ConnectorError> {
        let origin_center = self.origin_center()?;
        for anchor in &mut self.anchors {
            anchor.set_vector(origin_center)?;
        }
        Ok(())
    }

    fn origin_center(&self) -> Result<Point, ConnectorError> {
        let origin = self.origin();
        origin
            .center()
            .ok_or_else(|| ConnectorError::UnsupportedGeometry {
                kind: format!("{} (not projected)", origin.kind()),
            })
    }
}
