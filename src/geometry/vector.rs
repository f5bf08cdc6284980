use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A point or direction in layer (pixel) space.
///
/// Layer space follows the SVG convention: x grows rightward, y grows
/// downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// Unit vector along the x axis.
    pub const HORIZONTAL: Self = Self::new(1.0, 0.0);
    /// Unit vector along the y axis.
    pub const VERTICAL: Self = Self::new(0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        length(other - self)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        flip(self)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Direction from `b` to `a`, i.e. `a - b`.
///
/// Coincident points yield `(1, 1)` rather than the zero vector so that the
/// result can always be normalized.
#[must_use]
pub fn vector_between(a: Point, b: Point) -> Point {
    if a.x == b.x && a.y == b.y {
        return Point::new(1.0, 1.0);
    }
    a - b
}

#[must_use]
pub fn length(v: Point) -> f64 {
    (v.x * v.x + v.y * v.y).sqrt()
}

/// Scales `v` to unit length. Only a zero-length input produces NaN.
#[must_use]
pub fn normalize(v: Point) -> Point {
    let len = length(v);
    Point::new(v.x / len, v.y / len)
}

#[must_use]
pub fn flip(v: Point) -> Point {
    Point::new(-v.x, -v.y)
}

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtract_is_a_minus_b() {
        let v = vector_between(Point::new(5.0, 2.0), Point::new(1.0, 4.0));
        assert_eq!(v, Point::new(4.0, -2.0));
    }

    #[test]
    fn coincident_points_fall_back_to_diagonal() {
        let p = Point::new(12.5, -3.0);
        let v = vector_between(p, p);
        assert_eq!(v, Point::new(1.0, 1.0));
        let n = normalize(v);
        assert!(n.is_finite());
        assert!((length(n) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_keeps_direction() {
        let n = normalize(Point::new(3.0, 4.0));
        assert!((n.x - 0.6).abs() < 1e-12);
        assert!((n.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn flip_negates_both_axes() {
        assert_eq!(flip(Point::new(2.0, -7.0)), Point::new(-2.0, 7.0));
        assert_eq!(-Point::new(1.0, 1.0), Point::new(-1.0, -1.0));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
    }
}
