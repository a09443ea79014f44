//! Conversion of road center lines into solid ribbons.

use crate::clip::{self, PathSet};
use crate::error::TerraError;
use crate::scale::{FixedPointScale, ScaledPoint};
use terra_types::cartesian::{CartesianPoint2dFloat, Point2d};
use terra_types::Contour;

/// Builds road ribbons in fixed point coordinates.
#[derive(Debug, Clone, Copy)]
pub struct RoadOffsetter {
    scale: FixedPointScale,
    miter_limit: f64,
}

impl RoadOffsetter {
    /// Creates a new offsetter. `miter_limit` is the maximum distance of a mitered join from its vertex, as a multiple
    /// of the half width.
    pub fn new(scale: FixedPointScale, miter_limit: f64) -> Self {
        Self { scale, miter_limit }
    }

    /// Ribbons of one width class: every line is offset by half of `width` to both sides with mitered joins and
    /// square caps, then all the ribbons are merged.
    ///
    /// Lines with less than two distinct points have no ribbon and are skipped.
    pub fn ribbons<'a>(
        &self,
        width: f64,
        lines: impl IntoIterator<Item = &'a Contour<Point2d>>,
    ) -> Result<PathSet, TerraError> {
        let delta = self.scale.scale_length(width / 2.0)?;

        let mut scaled_lines = Vec::new();
        for line in lines {
            if let Some(scaled) = self.scale_line(line)? {
                scaled_lines.push(scaled);
            }
        }

        if scaled_lines.is_empty() {
            return Ok(PathSet::new());
        }

        let ribbons = clip::inflate_open(&scaled_lines, delta, self.miter_limit);
        clip::union(&ribbons)
    }

    /// Ribbons of all the classes merged into one set. `width_of` resolves the full width of a class in tile units.
    pub fn build<'a, L>(
        &self,
        groups: impl IntoIterator<Item = (u32, L)>,
        mut width_of: impl FnMut(u32) -> Result<f64, TerraError>,
    ) -> Result<PathSet, TerraError>
    where
        L: IntoIterator<Item = &'a Contour<Point2d>>,
    {
        let mut all = PathSet::new();
        for (class, lines) in groups {
            let width = width_of(class)?;
            let ribbons = self.ribbons(width, lines)?;
            log::trace!("Road class {class}: {} ribbon rings", ribbons.len());
            all.extend(ribbons);
        }

        clip::union(&all)
    }

    fn scale_line(&self, line: &Contour<Point2d>) -> Result<Option<Vec<ScaledPoint>>, TerraError> {
        if let Some(point) = line.iter_points().find(|p| !CartesianPoint2dFloat::is_finite(*p)) {
            return Err(TerraError::InvalidGeometry(format!(
                "road line has a non-finite point ({}, {})",
                point.x, point.y
            )));
        }

        let mut points: Vec<ScaledPoint> = line
            .iter_points()
            .map(|p| self.scale.to_scaled(p))
            .collect::<Result<_, _>>()?;
        points.dedup();

        if line.is_closed() && points.len() > 1 && points.first() != points.last() {
            if let Some(first) = points.first().copied() {
                points.push(first);
            }
        }

        if points.len() < 2 {
            log::trace!("Skipping degenerate road line with {} points", line.len());
            return Ok(None);
        }

        Ok(Some(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::path_set_area;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn offsetter() -> RoadOffsetter {
        RoadOffsetter::new(FixedPointScale::default(), 2.0)
    }

    fn area(scale: &FixedPointScale, paths: &PathSet) -> f64 {
        scale.area_to_planar(path_set_area(paths))
    }

    fn line(points: &[(f64, f64)]) -> Contour<Point2d> {
        Contour::open(points.iter().map(|&(x, y)| Point2d::new(x, y)).collect())
    }

    #[test]
    fn straight_ribbon_has_square_caps() {
        let offsetter = offsetter();
        let ribbon = offsetter
            .ribbons(2.0, [&line(&[(0.0, 5.0), (10.0, 5.0)])])
            .unwrap();

        // square caps extend the ribbon by half width at both ends
        assert_abs_diff_eq!(area(&offsetter.scale, &ribbon), 24.0, epsilon = 1e-6);
    }

    #[test]
    fn identical_lines_give_same_ribbon() {
        let offsetter = offsetter();
        let road = line(&[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);

        let single = offsetter.ribbons(1.0, [&road]).unwrap();
        let doubled = offsetter.ribbons(1.0, [&road, &road.clone()]).unwrap();

        assert_abs_diff_eq!(
            area(&offsetter.scale, &single),
            area(&offsetter.scale, &doubled),
            epsilon = 1e-6
        );
        assert_eq!(single.len(), doubled.len());
    }

    #[test]
    fn degenerate_lines_are_skipped() {
        let offsetter = offsetter();
        let single_point = line(&[(1.0, 1.0)]);
        let zero_length = line(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        let empty = line(&[]);

        let ribbons = offsetter
            .ribbons(2.0, [&single_point, &zero_length, &empty])
            .unwrap();
        assert!(ribbons.is_empty());
    }

    #[test]
    fn crossing_classes_are_merged() {
        let offsetter = offsetter();
        let horizontal = [line(&[(0.0, 5.0), (10.0, 5.0)])];
        let vertical = [line(&[(5.0, 0.0), (5.0, 10.0)])];

        let merged = offsetter
            .build([(1, horizontal.iter()), (2, vertical.iter())], |class| {
                Ok(class as f64)
            })
            .unwrap();

        // 11x1 and 2x12 ribbons overlapping on a 2x1 rectangle
        assert_abs_diff_eq!(area(&offsetter.scale, &merged), 33.0, epsilon = 1e-6);
    }

    #[test]
    fn width_errors_are_propagated() {
        let offsetter = offsetter();
        let lines = [line(&[(0.0, 5.0), (10.0, 5.0)])];
        let result = offsetter.build([(3, lines.iter())], |class| {
            Err(TerraError::MissingRoadWidth {
                layer: crate::style::LayerKind::CarRoad,
                class,
            })
        });
        assert_matches!(result, Err(TerraError::MissingRoadWidth { class: 3, .. }));
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let offsetter = offsetter();
        let result = offsetter.ribbons(2.0, [&line(&[(0.0, 0.0), (f64::NAN, 1.0)])]);
        assert_matches!(result, Err(TerraError::InvalidGeometry(_)));
    }
}
