//! Types and functions on geometries in cartesian coordinates.

mod point;
mod rect;
mod winding;

pub use point::{CartesianPoint2d, CartesianPoint2dFloat, Point2d};
pub use rect::Rect;
pub use winding::{AreaNum, CartesianClosedContour, Winding};
