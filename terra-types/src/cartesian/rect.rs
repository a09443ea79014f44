use crate::cartesian::point::CartesianPoint2d;
use crate::contour::ClosedContour;
use nalgebra::{Point2, Scalar};
use num_traits::{FromPrimitive, Num};
use serde::{Deserialize, Serialize};

/// Axis aligned rectangle, used for tile bounds.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect<N = f64> {
    /// Minimum x coordinate.
    pub x_min: N,
    /// Minimum y coordinate.
    pub y_min: N,
    /// Maximum x coordinate.
    pub x_max: N,
    /// Maximum y coordinate.
    pub y_max: N,
}

impl<N: Num + Copy + PartialOrd + Scalar + FromPrimitive> Rect<N> {
    /// Creates a new rectangle.
    pub fn new(x_min: N, y_min: N, x_max: N, y_max: N) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> N {
        self.x_max - self.x_min
    }

    /// Height of the rectangle.
    pub fn height(&self) -> N {
        self.y_max - self.y_min
    }

    /// Returns true if the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= N::zero() || self.height() <= N::zero()
    }

    /// Returns a rectangle grown by `amount` in every direction.
    pub fn expand(&self, amount: N) -> Self {
        Self {
            x_min: self.x_min - amount,
            y_min: self.y_min - amount,
            x_max: self.x_max + amount,
            y_max: self.y_max + amount,
        }
    }

    /// Bounding rectangle of the points, or `None` if the iterator is empty.
    pub fn from_points<'a, P: CartesianPoint2d<Num = N> + 'a>(
        mut points: impl Iterator<Item = &'a P>,
    ) -> Option<Self> {
        let first = points.next()?;
        let mut rect = Self::new(first.x(), first.y(), first.x(), first.y());

        for p in points {
            if rect.x_min > p.x() {
                rect.x_min = p.x();
            }
            if rect.y_min > p.y() {
                rect.y_min = p.y();
            }
            if rect.x_max < p.x() {
                rect.x_max = p.x();
            }
            if rect.y_max < p.y() {
                rect.y_max = p.y();
            }
        }

        Some(rect)
    }

    /// Corners of the rectangle in counter-clockwise order, starting from the minimum corner.
    pub fn into_quadrangle(self) -> [Point2<N>; 4] {
        [
            Point2::new(self.x_min, self.y_min),
            Point2::new(self.x_max, self.y_min),
            Point2::new(self.x_max, self.y_max),
            Point2::new(self.x_min, self.y_max),
        ]
    }

    /// Counter-clockwise ring around the rectangle.
    pub fn into_contour(self) -> ClosedContour<Point2<N>> {
        ClosedContour::new(Vec::from(self.into_quadrangle()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::{CartesianClosedContour, Point2d, Winding};

    #[test]
    fn dimensions() {
        let rect = Rect::new(0.0, 0.0, 10.0, 4.0);
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 4.0);
        assert!(!rect.is_empty());
        assert!(Rect::new(1.0, 1.0, 1.0, 5.0).is_empty());
    }

    #[test]
    fn from_points() {
        let points = [
            Point2d::new(3.0, -1.0),
            Point2d::new(-2.0, 4.0),
            Point2d::new(1.0, 1.0),
        ];
        let rect = Rect::from_points(points.iter()).unwrap();
        assert_eq!(rect, Rect::new(-2.0, -1.0, 3.0, 4.0));
        assert!(Rect::<f64>::from_points(std::iter::empty::<&Point2d>()).is_none());
    }

    #[test]
    fn contour_is_counter_clockwise() {
        let contour = Rect::new(0.0, 0.0, 2.0, 3.0).into_contour();
        assert_eq!(contour.winding(), Winding::CounterClockwise);
        assert_eq!(contour.area_signed(), 6.0);
    }

    #[test]
    fn expand() {
        let rect = Rect::new(0, 0, 10, 10).expand(2);
        assert_eq!(rect, Rect::new(-2, -2, 12, 12));
    }
}
