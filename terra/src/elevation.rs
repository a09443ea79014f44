//! Elevation lookup used when mesh vertices are emitted.

use terra_types::cartesian::Point2d;

/// Source of terrain elevation.
///
/// Lookups are expected to be fast and free of side effects: the mesh assembler queries the provider once for every
/// emitted vertex.
pub trait ElevationProvider {
    /// Elevation at the given point in tile coordinates.
    fn elevation(&self, point: &Point2d) -> f64;
}

/// Same elevation everywhere.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FlatElevation(pub f64);

impl ElevationProvider for FlatElevation {
    fn elevation(&self, _point: &Point2d) -> f64 {
        self.0
    }
}

impl<F> ElevationProvider for F
where
    F: Fn(&Point2d) -> f64,
{
    fn elevation(&self, point: &Point2d) -> f64 {
        self(point)
    }
}
