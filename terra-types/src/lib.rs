//! Planar geometry primitives used by the `terra` compositor.
//!
//! Everything in this crate works in one local cartesian frame: points are `nalgebra` points, contours are plain
//! point sequences and polygons are an outer contour with an ordered set of holes. No coordinate reference system
//! transformations are performed here.

pub mod cartesian;

pub mod contour;
pub use contour::{ClosedContour, Contour};

pub mod polygon;
pub use polygon::Polygon;

#[cfg(feature = "geo-types")]
mod geo_types;
