//! Fixed point representation of tile coordinates.
//!
//! Boolean operations on polygons are only exact on integer coordinates, so every planar coordinate is multiplied by
//! a scale factor and rounded before it reaches the clipping engine. One [`FixedPointScale`] must be used for all the
//! geometries of a tile: paths scaled with different factors can't be combined.

use crate::error::TerraError;
use nalgebra::Point2;
use terra_types::cartesian::{CartesianPoint2d, Point2d, Rect};
use terra_types::{ClosedContour, Polygon};

/// Scale factor used when none is configured. With it, coordinates up to about `2.3e10` tile units are supported.
pub const DEFAULT_SCALE: f64 = 1e8;

/// Largest absolute value of a scaled coordinate. The clipping engine works with 64 bit integers and reserves the
/// two upper bits to keep intermediate products in range.
pub const MAX_SCALED_COORDINATE: i64 = i64::MAX >> 2;

/// Point with fixed point coordinates.
pub type ScaledPoint = Point2<i64>;

/// Ring with fixed point coordinates.
pub type ScaledPath = ClosedContour<ScaledPoint>;

/// Polygon with holes with fixed point coordinates.
pub type ScaledRegion = Polygon<ScaledPoint>;

/// Conversion between planar and fixed point coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointScale {
    factor: f64,
}

impl Default for FixedPointScale {
    fn default() -> Self {
        Self {
            factor: DEFAULT_SCALE,
        }
    }
}

impl FixedPointScale {
    /// Creates a new scale. The factor must be a finite positive number.
    pub fn new(factor: f64) -> Result<Self, TerraError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self { factor })
        } else {
            Err(TerraError::InvalidScale(factor))
        }
    }

    /// Scale factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Largest absolute planar coordinate that can be represented.
    pub fn max_coordinate(&self) -> f64 {
        MAX_SCALED_COORDINATE as f64 / self.factor
    }

    /// Converts a planar point into fixed point coordinates, rounding to the nearest integer.
    pub fn to_scaled(&self, point: &impl CartesianPoint2d<Num = f64>) -> Result<ScaledPoint, TerraError> {
        Ok(ScaledPoint::new(
            self.scale_coordinate(point.x())?,
            self.scale_coordinate(point.y())?,
        ))
    }

    /// Converts a fixed point back into planar coordinates.
    pub fn to_planar(&self, point: &ScaledPoint) -> Point2d {
        Point2d::new(
            point.x as f64 / self.factor,
            point.y as f64 / self.factor,
        )
    }

    /// Converts a length into scaled units.
    pub fn scale_length(&self, length: f64) -> Result<f64, TerraError> {
        let scaled = length * self.factor;
        if scaled.is_finite() && scaled.abs() < MAX_SCALED_COORDINATE as f64 {
            Ok(scaled)
        } else {
            Err(self.overflow(length))
        }
    }

    /// Converts an area in squared scaled units into square tile units.
    pub fn area_to_planar(&self, scaled_area: f64) -> f64 {
        scaled_area / (self.factor * self.factor)
    }

    /// Checks that every point of `rect` grown by `margin` can be represented.
    pub fn check_bounds(&self, rect: &Rect, margin: f64) -> Result<(), TerraError> {
        let rect = rect.expand(margin);
        for value in [rect.x_min, rect.y_min, rect.x_max, rect.y_max] {
            self.scale_coordinate(value)?;
        }

        Ok(())
    }

    fn scale_coordinate(&self, value: f64) -> Result<i64, TerraError> {
        let scaled = (value * self.factor).round();
        if scaled.is_finite() && scaled.abs() < MAX_SCALED_COORDINATE as f64 {
            Ok(scaled as i64)
        } else {
            Err(self.overflow(value))
        }
    }

    fn overflow(&self, value: f64) -> TerraError {
        TerraError::PrecisionOverflow {
            value,
            scale: self.factor,
        }
    }
}
