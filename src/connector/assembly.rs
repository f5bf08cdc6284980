use log::{debug, trace};
use serde::Serialize;

use crate::geometry::{Point, flip};

use super::{Anchor, ConnectorError};

/// A drawn connector line, origin side first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct Assembly {
    pub segments: Vec<Segment>,
    /// Indices of anchors that produced no segment.
    pub omitted: Vec<usize>,
}

/// Connects the origin (first anchor) to every other anchor.
pub(super) fn assemble(anchors: &[Anchor<'_>]) -> Result<Assembly, ConnectorError> {
    let mut assembly = Assembly::default();
    let Some(origin) = anchors.first() else {
        return Ok(assembly);
    };

    for (idx, anchor) in anchors.iter().enumerate() {
        if anchor.is_origin() {
            continue;
        }
        let toward_target = anchor
            .normalized_vector()
            .map(flip)
            .ok_or_else(|| ConnectorError::UnsupportedGeometry {
                kind: format!("{} (no direction)", anchor.kind()),
            })?;
        let origin_view = origin.oriented(toward_target);

        let origin_candidates = origin_view.boundary_points(anchor)?;
        let target_candidates = anchor.boundary_points(&origin_view)?;
        trace!(
            "anchor {idx} ({}): {} origin candidates, {} target candidates",
            anchor.kind(),
            origin_candidates.len(),
            target_candidates.len()
        );

        match closest_pair(&origin_candidates, &target_candidates) {
            Some(segment) => assembly.segments.push(segment),
            None => {
                debug!("anchor {idx} ({}) has no boundary pair, skipping", anchor.kind());
                assembly.omitted.push(idx);
            }
        }
    }

    Ok(assembly)
}

/// The pair `(p, q)` with the smallest distance. Ties keep the first pair
/// seen, iterating origin candidates in the outer loop.
pub fn closest_pair(origin: &[Point], target: &[Point]) -> Option<Segment> {
    let mut best: Option<(f64, Segment)> = None;
    for &p in origin {
        for &q in target {
            let distance = p.distance_to(q);
            if !distance.is_finite() {
                continue;
            }
            match best {
                Some((best_distance, _)) if distance >= best_distance => {}
                _ => best = Some((distance, Segment::new(p, q))),
            }
        }
    }
    best.map(|(_, segment)| segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_nearest_pair() {
        let origin = [Point::new(10.0, 0.0), Point::new(-10.0, 0.0)];
        let target = [Point::new(95.0, 0.0), Point::new(105.0, 0.0)];
        let segment = closest_pair(&origin, &target).unwrap();
        assert_eq!(segment, Segment::new(Point::new(10.0, 0.0), Point::new(95.0, 0.0)));
        assert!((segment.length() - 85.0).abs() < 1e-12);
    }

    #[test]
    fn ties_keep_the_first_pair() {
        let origin = [Point::new(0.0, 1.0), Point::new(0.0, -1.0)];
        let target = [Point::new(0.0, 0.0)];
        let segment = closest_pair(&origin, &target).unwrap();
        assert_eq!(segment.start, Point::new(0.0, 1.0));
    }

    #[test]
    fn empty_side_yields_nothing() {
        assert_eq!(closest_pair(&[], &[Point::ZERO]), None);
        assert_eq!(closest_pair(&[Point::ZERO], &[]), None);
    }

    #[test]
    fn nan_candidates_are_ignored() {
        let origin = [Point::new(f64::NAN, 0.0), Point::new(1.0, 0.0)];
        let target = [Point::new(2.0, 0.0)];
        let segment = closest_pair(&origin, &target).unwrap();
        assert_eq!(segment.start, Point::new(1.0, 0.0));
    }
}
