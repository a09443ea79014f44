use crate::cartesian::point::CartesianPoint2d;
use crate::contour::ClosedContour;
use num_traits::{Num, Signed, ToPrimitive, Zero};

/// Direction in which the points of a closed contour go around its interior.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Winding {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    CounterClockwise,
}

/// Coordinate type with a wider type that holds products of two coordinates without loss.
///
/// For integer coordinates the widening keeps area computations exact: the product of two `i64` values always fits
/// into `i128`.
pub trait AreaNum: Copy {
    /// Type areas are accumulated in.
    type Area: Num + Signed + Copy + PartialOrd + ToPrimitive;

    /// Converts the coordinate into the area type.
    fn widen(self) -> Self::Area;
}

impl AreaNum for f32 {
    type Area = f64;

    fn widen(self) -> f64 {
        self as f64
    }
}

impl AreaNum for f64 {
    type Area = f64;

    fn widen(self) -> f64 {
        self
    }
}

impl AreaNum for i32 {
    type Area = i64;

    fn widen(self) -> i64 {
        self as i64
    }
}

impl AreaNum for i64 {
    type Area = i128;

    fn widen(self) -> i128 {
        self as i128
    }
}

/// Area and orientation of closed contours in cartesian space.
pub trait CartesianClosedContour {
    /// Type the area is computed in.
    type Area;

    /// Twice the signed area of the contour, positive for counter-clockwise contours. Exact for integer
    /// coordinates.
    fn double_area_signed(&self) -> Self::Area;

    /// Signed area of the contour. Positive for counter-clockwise contours.
    fn area_signed(&self) -> f64;

    /// Winding of the contour. Contours without area are considered clockwise.
    fn winding(&self) -> Winding;

    /// Returns the contour with its points going in the given direction.
    fn oriented(self, winding: Winding) -> Self
    where
        Self: Sized;
}

impl<P> CartesianClosedContour for ClosedContour<P>
where
    P: CartesianPoint2d,
    P::Num: AreaNum,
{
    type Area = <P::Num as AreaNum>::Area;

    fn double_area_signed(&self) -> Self::Area {
        let Some(origin) = self.points.first() else {
            return Zero::zero();
        };

        // shoelace over coordinates relative to the first point
        let (ox, oy) = (origin.x().widen(), origin.y().widen());
        let mut aggr: Self::Area = Zero::zero();
        let mut prev: (Self::Area, Self::Area) = (Zero::zero(), Zero::zero());
        for p in self.iter_points_closing().skip(1) {
            let curr = (p.x().widen() - ox, p.y().widen() - oy);
            aggr = aggr + prev.0 * curr.1 - curr.0 * prev.1;
            prev = curr;
        }

        aggr
    }

    fn area_signed(&self) -> f64 {
        self.double_area_signed()
            .to_f64()
            .map_or(f64::NAN, |area| area / 2.0)
    }

    fn winding(&self) -> Winding {
        if self.double_area_signed() <= Zero::zero() {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    fn oriented(mut self, winding: Winding) -> Self {
        if self.winding() != winding {
            self.reverse();
        }
        self
    }
}
