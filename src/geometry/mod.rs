mod classify;
mod intersect;
mod vector;

pub use classify::{AnchorKind, classify};
pub use intersect::{
    Border, Shape, boundary_points, circle_boundary_points, segment_intersection,
    square_borders, square_boundary_points,
};
pub use vector::{Point, cross, flip, length, normalize, vector_between};
