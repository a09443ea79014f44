//! Conversions from [`geo_types`] geometries.

use crate::cartesian::Point2d;
use crate::contour::{ClosedContour, Contour};
use crate::polygon::Polygon;
use geo_types::{Coord, LineString};

fn point(coord: &Coord<f64>) -> Point2d {
    Point2d::new(coord.x, coord.y)
}

fn ring(line: &LineString<f64>) -> ClosedContour<Point2d> {
    let mut contour = ClosedContour::new(line.coords().map(point).collect());
    contour.dedup();
    contour
}

impl From<&LineString<f64>> for Contour<Point2d> {
    fn from(value: &LineString<f64>) -> Self {
        let mut contour = Contour::new(value.coords().map(point).collect(), value.is_closed());
        contour.dedup();
        contour
    }
}

impl From<&geo_types::Polygon<f64>> for Polygon<Point2d> {
    fn from(value: &geo_types::Polygon<f64>) -> Self {
        Polygon::new(
            ring(value.exterior()),
            value.interiors().iter().map(ring).collect(),
        )
    }
}
