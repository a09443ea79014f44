//! Contour is a sequence of points.
//!
//! Contours can be:
//! * **open** - the first and the last points of the contour are not connected. Road centerlines are open contours.
//! * **closed** - the first and the last points of the contour are connected. Borders of water bodies or land-cover
//!   areas are closed contours.
//!
//! Neither type duplicates the first point at the end of a closed sequence. Use
//! [`ClosedContour::iter_points_closing`] when the closing segment is needed.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Sequence of points that is either open or closed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Contour<P> {
    points: Vec<P>,
    is_closed: bool,
}

impl<P> Deref for Contour<P> {
    type Target = Vec<P>;

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl<P> Contour<P> {
    /// Creates a new contour.
    pub fn new(points: Vec<P>, is_closed: bool) -> Self {
        Self { points, is_closed }
    }

    /// Creates a new open contour.
    pub fn open(points: Vec<P>) -> Self {
        Self::new(points, false)
    }

    /// Creates a new closed contour.
    pub fn closed(points: Vec<P>) -> Self {
        Self::new(points, true)
    }

    /// Whether the last point is connected to the first one.
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Iterates over the points of the contour.
    pub fn iter_points(&self) -> impl Iterator<Item = &P> {
        self.points.iter()
    }
}

impl<P: PartialEq> Contour<P> {
    /// Removes consecutive duplicate points. For closed contours the last point is also removed if it repeats the
    /// first one.
    pub fn dedup(&mut self) {
        dedup_points(&mut self.points, self.is_closed);
    }
}

/// Closed sequence of points (a ring).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ClosedContour<P> {
    /// Points of the contour. The first point is not repeated at the end.
    pub points: Vec<P>,
}

impl<P> ClosedContour<P> {
    /// Creates a new closed contour.
    pub fn new(points: Vec<P>) -> Self {
        Self { points }
    }

    /// Iterates over the points of the contour.
    pub fn iter_points(&self) -> impl Iterator<Item = &P> {
        self.points.iter()
    }

    /// Iterates over the points of the contour, repeating the first point at the end.
    pub fn iter_points_closing(&self) -> impl Iterator<Item = &P> {
        self.points.iter().chain(self.points.first())
    }

    /// Number of points in the contour.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the contour has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reverses the direction of the contour.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Converts every point with the given function.
    pub fn map_points<T>(&self, cast: impl FnMut(&P) -> T) -> ClosedContour<T> {
        ClosedContour {
            points: self.points.iter().map(cast).collect(),
        }
    }
}

impl<P: PartialEq> ClosedContour<P> {
    /// Removes consecutive duplicate points, including a last point that repeats the first one.
    pub fn dedup(&mut self) {
        dedup_points(&mut self.points, true);
    }
}

impl<P> From<ClosedContour<P>> for Contour<P> {
    fn from(value: ClosedContour<P>) -> Self {
        Self::closed(value.points)
    }
}

fn dedup_points<P: PartialEq>(points: &mut Vec<P>, is_closed: bool) {
    points.dedup();
    if is_closed && points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::Point2d;

    #[test]
    fn iter_points_closing() {
        let contour = ClosedContour::new(vec![Point2d::new(0.0, 0.0), Point2d::new(1.0, 1.0)]);
        assert_eq!(contour.iter_points_closing().count(), 3);
        assert_eq!(
            *contour.iter_points_closing().last().unwrap(),
            Point2d::new(0.0, 0.0)
        );
    }

    #[test]
    fn dedup() {
        let mut contour = Contour::open(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(0.0, 0.0),
        ]);
        contour.dedup();
        assert_eq!(contour.len(), 3);

        let mut ring = ClosedContour::new(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(0.0, 0.0),
        ]);
        ring.dedup();
        assert_eq!(ring.len(), 3);
    }
}
