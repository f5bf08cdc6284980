//! Boundary intersection: where a line between two anchor centres leaves
//! an anchor's shape.
//!
//! Every function here returns the full candidate set. Picking the pair of
//! candidates that is actually drawn happens in connector assembly.

use super::vector::{Point, cross};

/// Slack applied to the segment parameters so that hits landing exactly on
/// a corner or on a segment end survive rounding.
const PARAM_EPSILON: f64 = 1e-9;
/// Below this the connecting line is treated as parallel to a border.
const PARALLEL_EPSILON: f64 = 1e-12;

/// A shape resolved to layer space for one update cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Point(Point),
    /// Circles and circle markers, radius already in pixels.
    Circle { center: Point, radius: f64 },
    /// Axis-aligned square, `half_side` in pixels.
    Square { center: Point, half_side: f64 },
}

impl Shape {
    pub fn center(&self) -> Point {
        match *self {
            Shape::Point(p) => p,
            Shape::Circle { center, .. } | Shape::Square { center, .. } => center,
        }
    }
}

/// One edge of a square: `start + direction * s` for `s` in `[0, length]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub start: Point,
    pub direction: Point,
    pub length: f64,
}

impl Border {
    pub fn end(&self) -> Point {
        self.start + self.direction * self.length
    }
}

/// Candidate boundary points of `shape` toward another anchor.
///
/// `direction` is the unit vector from this shape's centre toward the other
/// anchor and `other_center` is the other anchor's centre.
pub fn boundary_points(shape: &Shape, direction: Point, other_center: Point) -> Vec<Point> {
    match *shape {
        Shape::Point(p) => vec![p],
        Shape::Circle { center, radius } => circle_boundary_points(center, radius, direction).to_vec(),
        Shape::Square { center, half_side } => {
            let reach = center.distance_to(other_center);
            square_boundary_points(center, half_side, direction, reach)
        }
    }
}

/// Both crossings of the line through the centres with the circle, near side
/// first.
pub fn circle_boundary_points(center: Point, radius: f64, direction: Point) -> [Point; 2] {
    let offset = direction * radius;
    [center + offset, center - offset]
}

/// The four borders in bottom, right, top, left order.
pub fn square_borders(center: Point, half_side: f64) -> [Border; 4] {
    let h = Point::HORIZONTAL;
    let v = Point::VERTICAL;
    let length = half_side * 2.0;
    [
        Border {
            start: center + v * half_side - h * half_side,
            direction: h,
            length,
        },
        Border {
            start: center + h * half_side - v * half_side,
            direction: v,
            length,
        },
        Border {
            start: center - v * half_side - h * half_side,
            direction: h,
            length,
        },
        Border {
            start: center - h * half_side - v * half_side,
            direction: v,
            length,
        },
    ]
}

/// Every border hit of the segment `center + direction * t`, `t` in
/// `[0, reach]`.
pub fn square_boundary_points(
    center: Point,
    half_side: f64,
    direction: Point,
    reach: f64,
) -> Vec<Point> {
    square_borders(center, half_side)
        .iter()
        .filter_map(|border| segment_intersection(border, center, direction, reach))
        .collect()
}

/// Intersects a border with the segment `line_start + line_direction * t`,
/// `t` in `[0, line_length]`.
///
/// Returns `None` for parallel lines and for crossings outside either
/// segment. The returned point is taken from the border's parametrisation
/// so it lies exactly on the border line.
pub fn segment_intersection(
    border: &Border,
    line_start: Point,
    line_direction: Point,
    line_length: f64,
) -> Option<Point> {
    let denom = cross(line_direction, border.direction);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let q = border.start - line_start;
    let t = cross(q, border.direction) / denom;
    let u = cross(q, line_direction) / denom;
    if t < -PARAM_EPSILON || t > line_length + PARAM_EPSILON {
        return None;
    }
    if u < -PARAM_EPSILON || u > border.length + PARAM_EPSILON {
        return None;
    }
    let u = u.max(0.0).min(border.length);
    Some(border.start + border.direction * u)
}
