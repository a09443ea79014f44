//! Polygons made of an outer contour and an ordered set of holes.

use crate::cartesian::{AreaNum, CartesianClosedContour, CartesianPoint2d, Winding};
use crate::contour::ClosedContour;
use num_traits::{Signed, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Polygon with holes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Polygon<P> {
    /// Outer contour.
    pub outer_contour: ClosedContour<P>,
    /// Inner contours (holes).
    pub inner_contours: Vec<ClosedContour<P>>,
}

impl<P> Polygon<P> {
    /// Creates a new polygon.
    pub fn new(outer_contour: ClosedContour<P>, inner_contours: Vec<ClosedContour<P>>) -> Self {
        Self {
            outer_contour,
            inner_contours,
        }
    }

    /// Outer contour of the polygon.
    pub fn outer_contour(&self) -> &ClosedContour<P> {
        &self.outer_contour
    }

    /// Holes of the polygon.
    pub fn inner_contours(&self) -> impl Iterator<Item = &ClosedContour<P>> {
        self.inner_contours.iter()
    }

    /// Iterates over all contours, the outer one first.
    pub fn iter_contours(&self) -> impl Iterator<Item = &ClosedContour<P>> {
        std::iter::once(&self.outer_contour).chain(self.inner_contours.iter())
    }

    /// Casts all points of the polygon with the given function.
    pub fn cast_points<T>(&self, mut cast: impl FnMut(&P) -> T) -> Polygon<T> {
        Polygon {
            outer_contour: self.outer_contour.map_points(&mut cast),
            inner_contours: self
                .inner_contours
                .iter()
                .map(|c| c.map_points(&mut cast))
                .collect(),
        }
    }

    /// Casts all points of the polygon with a fallible function, stopping at the first error.
    pub fn try_cast_points<T, E>(
        &self,
        mut cast: impl FnMut(&P) -> Result<T, E>,
    ) -> Result<Polygon<T>, E> {
        let mut cast_contour = |contour: &ClosedContour<P>| -> Result<ClosedContour<T>, E> {
            Ok(ClosedContour::new(
                contour
                    .iter_points()
                    .map(&mut cast)
                    .collect::<Result<Vec<T>, E>>()?,
            ))
        };

        Ok(Polygon {
            outer_contour: cast_contour(&self.outer_contour)?,
            inner_contours: self
                .inner_contours
                .iter()
                .map(&mut cast_contour)
                .collect::<Result<Vec<_>, E>>()?,
        })
    }
}

impl<P> Polygon<P>
where
    P: CartesianPoint2d,
    P::Num: AreaNum,
{
    /// Area of the polygon: the area of the outer contour minus the areas of the holes.
    ///
    /// The difference is taken in the wide area type, so for integer coordinates only the final conversion to `f64`
    /// rounds.
    pub fn area(&self) -> f64 {
        self.inner_contours
            .iter()
            .fold(self.outer_contour.double_area_signed().abs(), |area, hole| {
                area - hole.double_area_signed().abs()
            })
            .to_f64()
            .map_or(f64::NAN, |area| area / 2.0)
    }

    /// Returns the polygon with the outer contour going counter-clockwise and the holes going clockwise.
    pub fn normalized(self) -> Self {
        Self {
            outer_contour: self.outer_contour.oriented(Winding::CounterClockwise),
            inner_contours: self
                .inner_contours
                .into_iter()
                .map(|c| c.oriented(Winding::Clockwise))
                .collect(),
        }
    }
}

impl<P> From<ClosedContour<P>> for Polygon<P> {
    fn from(value: ClosedContour<P>) -> Self {
        Self {
            outer_contour: value,
            inner_contours: vec![],
        }
    }
}

impl<P> From<Vec<P>> for Polygon<P> {
    fn from(value: Vec<P>) -> Self {
        Self {
            outer_contour: ClosedContour::new(value),
            inner_contours: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::{Point2d, Rect};

    fn square_with_hole() -> Polygon<Point2d> {
        let mut hole = Rect::new(1.0, 1.0, 2.0, 2.0).into_contour();
        hole.reverse();
        Polygon::new(Rect::new(0.0, 0.0, 4.0, 4.0).into_contour(), vec![hole])
    }

    #[test]
    fn area_subtracts_holes() {
        assert_eq!(square_with_hole().area(), 15.0);
    }

    #[test]
    fn normalized() {
        let mut polygon = square_with_hole();
        polygon.outer_contour.reverse();
        polygon.inner_contours[0].reverse();

        let polygon = polygon.normalized();
        assert_eq!(polygon.outer_contour.winding(), Winding::CounterClockwise);
        assert_eq!(polygon.inner_contours[0].winding(), Winding::Clockwise);
        assert_eq!(polygon.area(), 15.0);
    }

    #[test]
    fn integer_area_does_not_overflow() {
        // 100 x 100 tile units at a 1e8 fixed point scale
        let side = 10_000_000_000i64;
        let mut hole = Rect::new(side / 4, side / 4, side / 2, side / 2).into_contour();
        hole.reverse();
        let polygon = Polygon::new(Rect::new(0, 0, side, side).into_contour(), vec![hole]);

        assert_eq!(polygon.area(), 1e20 - 1e20 / 16.0);
        assert_eq!(polygon.normalized().area(), 1e20 - 1e20 / 16.0);
    }

    #[test]
    fn iter_contours() {
        let polygon = square_with_hole();
        assert_eq!(polygon.iter_contours().count(), 2);
        assert_eq!(polygon.inner_contours().count(), 1);
    }

    #[test]
    fn try_cast_points() {
        let polygon = square_with_hole();
        let cast: Result<Polygon<(i64, i64)>, ()> =
            polygon.try_cast_points(|p| Ok((p.x as i64, p.y as i64)));
        assert_eq!(cast.unwrap().outer_contour.points[2], (4, 4));

        let failed: Result<Polygon<i64>, &str> = polygon.try_cast_points(|p| {
            if p.x > 3.0 {
                Err("out of range")
            } else {
                Ok(p.x as i64)
            }
        });
        assert_eq!(failed, Err("out of range"));
    }
}
