//! Boolean operations and offsetting on fixed point paths.
//!
//! Every function here builds its own clipping engine input and returns owned output, nothing is retained between
//! calls. All boolean operations use the positive fill rule: a point is covered if the winding number of the paths
//! around it is positive. Because of that, rings passed in must be oriented: outer contours counter-clockwise and
//! holes clockwise. [`region_paths`] and [`into_regions`] take care of it.

use crate::error::TerraError;
use crate::scale::{ScaledPath, ScaledPoint, ScaledRegion};
use clipper2::{EndType, FillRule, JoinType, Path, Paths, Point, PointScaler};
use std::fmt::{Display, Formatter};
use terra_types::cartesian::{CartesianClosedContour, Rect, Winding};

/// Set of oriented rings. Rings going counter-clockwise add to the covered area, clockwise ones subtract from it.
pub type PathSet = Vec<ScaledPath>;

/// Boolean operation executed by the clipping engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    /// Area covered by any of the inputs.
    Union,
    /// Area of the subject not covered by the clip.
    Difference,
    /// Area covered by both the subject and the clip.
    Intersection,
}

impl Display for BooleanOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BooleanOp::Union => "union",
            BooleanOp::Difference => "difference",
            BooleanOp::Intersection => "intersection",
        };
        write!(f, "{name}")
    }
}

/// Points are already scaled by [`crate::scale::FixedPointScale`], the engine must take them as they are.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Unscaled;

impl PointScaler for Unscaled {
    const MULTIPLIER: f64 = 1.0;
}

/// Merges all the paths into non-overlapping rings.
pub fn union(subject: &[ScaledPath]) -> Result<PathSet, TerraError> {
    execute(BooleanOp::Union, subject, &[])
}

/// Area of `subject` that is not covered by `clip`.
pub fn difference(subject: &[ScaledPath], clip: &[ScaledPath]) -> Result<PathSet, TerraError> {
    execute(BooleanOp::Difference, subject, clip)
}

/// Area covered by both `subject` and `clip`.
pub fn intersection(subject: &[ScaledPath], clip: &[ScaledPath]) -> Result<PathSet, TerraError> {
    execute(BooleanOp::Intersection, subject, clip)
}

fn execute(
    op: BooleanOp,
    subject: &[ScaledPath],
    clip: &[ScaledPath],
) -> Result<PathSet, TerraError> {
    if subject.is_empty() || (op == BooleanOp::Intersection && clip.is_empty()) {
        return Ok(PathSet::new());
    }

    let subject = to_engine_paths(subject.iter().map(|path| path.points.as_slice()));
    let clip = to_engine_paths(clip.iter().map(|path| path.points.as_slice()));

    let solution = match op {
        BooleanOp::Union => clipper2::union(subject, clip, FillRule::Positive),
        BooleanOp::Difference => clipper2::difference(subject, clip, FillRule::Positive),
        BooleanOp::Intersection => clipper2::intersect(subject, clip, FillRule::Positive),
    }
    .map_err(|source| TerraError::BooleanOperation { op, source })?;

    Ok(from_engine_paths(&solution))
}

/// Turns open polylines into closed ribbons `2 * delta` wide, with mitered joins and square caps extending `delta`
/// beyond both ends of every line. Overlapping ribbons are merged.
pub fn inflate_open(lines: &[Vec<ScaledPoint>], delta: f64, miter_limit: f64) -> PathSet {
    if lines.is_empty() {
        return PathSet::new();
    }

    let paths = to_engine_paths(lines.iter().map(Vec::as_slice));
    let inflated = paths.inflate(delta, JoinType::Miter, EndType::Square, miter_limit);
    from_engine_paths(&inflated)
}

fn to_engine_paths<'a>(paths: impl Iterator<Item = &'a [ScaledPoint]>) -> Paths<Unscaled> {
    Paths::new(
        paths
            .map(|points| {
                Path::new(
                    points
                        .iter()
                        .map(|p| Point::from_scaled(p.x, p.y))
                        .collect(),
                )
            })
            .collect(),
    )
}

fn from_engine_paths(paths: &Paths<Unscaled>) -> PathSet {
    paths
        .iter()
        .map(|path| {
            ScaledPath::new(
                path.iter()
                    .map(|p| ScaledPoint::new(p.x_scaled(), p.y_scaled()))
                    .collect(),
            )
        })
        .filter(|path| path.len() >= 3)
        .collect()
}

/// Sum of the areas of all the rings in the set in squared scaled units, taking their orientation into account.
pub fn path_set_area(paths: &[ScaledPath]) -> f64 {
    paths.iter().map(|path| path.area_signed()).sum()
}

/// Position of a point relative to a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPosition {
    /// The point is inside the ring.
    Inside,
    /// The point is outside the ring.
    Outside,
    /// The point lies on one of the ring segments.
    OnBoundary,
}

/// Locates a point relative to a ring using its winding number.
pub fn point_in_ring(point: &ScaledPoint, ring: &ScaledPath) -> RingPosition {
    let (px, py) = (point.x as i128, point.y as i128);
    let mut winding = 0;

    for (a, b) in ring
        .iter_points()
        .zip(ring.iter_points_closing().skip(1))
    {
        let (ax, ay) = (a.x as i128, a.y as i128);
        let (bx, by) = (b.x as i128, b.y as i128);
        let cross = (bx - ax) * (py - ay) - (px - ax) * (by - ay);

        if cross == 0
            && px >= ax.min(bx)
            && px <= ax.max(bx)
            && py >= ay.min(by)
            && py <= ay.max(by)
        {
            return RingPosition::OnBoundary;
        }

        if ay <= py {
            if by > py && cross > 0 {
                winding += 1;
            }
        } else if by <= py && cross < 0 {
            winding -= 1;
        }
    }

    if winding == 0 {
        RingPosition::Outside
    } else {
        RingPosition::Inside
    }
}

/// Returns true if `inner` lies inside `outer`. Rings produced by the clipping engine don't cross, so the first
/// vertex of `inner` that is not on the boundary of `outer` decides.
fn ring_contains(outer: &ScaledPath, inner: &ScaledPath) -> bool {
    for point in inner.iter_points() {
        match point_in_ring(point, outer) {
            RingPosition::Inside => return true,
            RingPosition::Outside => return false,
            RingPosition::OnBoundary => continue,
        }
    }

    false
}

fn covers(outer: &Rect<i64>, inner: &Rect<i64>) -> bool {
    outer.x_min <= inner.x_min
        && outer.y_min <= inner.y_min
        && outer.x_max >= inner.x_max
        && outer.y_max >= inner.y_max
}

/// Oriented rings of a region: the outer contour counter-clockwise, holes clockwise. Rings without area are skipped.
pub fn region_paths(region: &ScaledRegion) -> PathSet {
    let outer = region.outer_contour();
    if outer.double_area_signed() == 0 {
        return PathSet::new();
    }

    let region = ScaledRegion::new(
        outer.clone(),
        region
            .inner_contours()
            .filter(|hole| hole.double_area_signed() != 0)
            .cloned()
            .collect(),
    )
    .normalized();

    std::iter::once(region.outer_contour)
        .chain(region.inner_contours)
        .collect()
}

/// Oriented rings of all the regions.
pub fn flatten(regions: &[ScaledRegion]) -> PathSet {
    regions.iter().flat_map(region_paths).collect()
}

struct PlacedRing {
    region: usize,
    hole: Option<usize>,
    depth: usize,
    bounds: Rect<i64>,
}

/// Groups rings into polygons with holes.
///
/// Rings are nested by containment: a ring inside an even number of other rings is an outer contour, a ring inside
/// an odd number is a hole of the smallest outer contour around it. The orientation of the input rings doesn't
/// matter. In the output outer contours go counter-clockwise and holes go clockwise.
pub fn into_regions(paths: PathSet) -> Vec<ScaledRegion> {
    let mut rings: Vec<(i128, ScaledPath)> = paths
        .into_iter()
        .map(|path| (path.double_area_signed().abs(), path))
        .filter(|(area, _)| *area > 0)
        .collect();
    rings.sort_by(|a, b| b.0.cmp(&a.0));

    let mut regions: Vec<ScaledRegion> = Vec::new();
    let mut placed: Vec<PlacedRing> = Vec::with_capacity(rings.len());

    for (_, ring) in rings {
        let Some(bounds) = Rect::from_points(ring.iter_points()) else {
            continue;
        };

        let parent = placed
            .iter()
            .rev()
            .find(|candidate| {
                let candidate_ring = match candidate.hole {
                    Some(hole) => &regions[candidate.region].inner_contours[hole],
                    None => &regions[candidate.region].outer_contour,
                };
                covers(&candidate.bounds, &bounds) && ring_contains(candidate_ring, &ring)
            })
            .map(|candidate| (candidate.region, candidate.depth));

        match parent {
            Some((region, depth)) if depth % 2 == 0 => {
                let holes = &mut regions[region].inner_contours;
                holes.push(ring.oriented(Winding::Clockwise));
                placed.push(PlacedRing {
                    region,
                    hole: Some(holes.len() - 1),
                    depth: depth + 1,
                    bounds,
                });
            }
            parent => {
                regions.push(ScaledRegion::new(
                    ring.oriented(Winding::CounterClockwise),
                    vec![],
                ));
                placed.push(PlacedRing {
                    region: regions.len() - 1,
                    hole: None,
                    depth: parent.map(|(_, depth)| depth + 1).unwrap_or(0),
                    bounds,
                });
            }
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::FixedPointScale;
    use crate::tests::{rect_path, square_path};
    use approx::assert_abs_diff_eq;

    #[test]
    fn union_of_overlapping_squares() {
        let result = union(&[square_path(0, 0, 20), square_path(10, 10, 20)]).unwrap();
        assert_eq!(path_set_area(&result), 700.0);
        assert_eq!(into_regions(result).len(), 1);
    }

    #[test]
    fn union_counts_overlaps_once() {
        let single = union(&[square_path(0, 0, 10)]).unwrap();
        let doubled = union(&[square_path(0, 0, 10), square_path(0, 0, 10)]).unwrap();
        assert_eq!(path_set_area(&single), path_set_area(&doubled));
        assert_eq!(path_set_area(&doubled), 100.0);
    }

    #[test]
    fn difference_makes_hole() {
        let result = difference(&[square_path(0, 0, 30)], &[square_path(10, 10, 10)]).unwrap();
        assert_eq!(path_set_area(&result), 800.0);

        let regions = into_regions(result);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].inner_contours.len(), 1);
        assert_eq!(regions[0].area(), 800.0);
        assert_eq!(regions[0].outer_contour.winding(), Winding::CounterClockwise);
        assert_eq!(regions[0].inner_contours[0].winding(), Winding::Clockwise);
    }

    #[test]
    fn holes_are_respected_by_later_operations() {
        let ring = flatten(&into_regions(
            difference(&[square_path(0, 0, 30)], &[square_path(10, 10, 10)]).unwrap(),
        ));

        let inside_hole = intersection(&[square_path(12, 12, 5)], &ring).unwrap();
        assert!(inside_hole.is_empty());

        let remaining = difference(&[square_path(0, 0, 30)], &ring).unwrap();
        assert_eq!(path_set_area(&remaining), 100.0);
    }

    #[test]
    fn intersection_clips() {
        let result = intersection(&[rect_path(-5, 40, 15, 60)], &[square_path(0, 0, 100)]).unwrap();
        assert_eq!(path_set_area(&result), 15.0 * 20.0);

        assert!(intersection(&[square_path(0, 0, 10)], &[]).unwrap().is_empty());
        assert!(difference(&[], &[square_path(0, 0, 10)]).unwrap().is_empty());
    }

    #[test]
    fn nested_islands() {
        let paths = vec![
            square_path(0, 0, 100),
            square_path(20, 20, 60),
            square_path(40, 40, 20),
        ];
        let regions = into_regions(paths);

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].inner_contours.len(), 1);
        assert_eq!(regions[0].area(), 10000.0 - 3600.0);
        assert!(regions[1].inner_contours.is_empty());
        assert_eq!(regions[1].area(), 400.0);
    }

    #[test]
    fn touching_rings_are_separate_regions() {
        let regions = into_regions(vec![square_path(0, 0, 10), square_path(10, 0, 10)]);
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|r| r.inner_contours.is_empty()));
    }

    #[test]
    fn point_positions() {
        let ring = square_path(0, 0, 10);
        assert_eq!(point_in_ring(&ScaledPoint::new(5, 5), &ring), RingPosition::Inside);
        assert_eq!(point_in_ring(&ScaledPoint::new(15, 5), &ring), RingPosition::Outside);
        assert_eq!(point_in_ring(&ScaledPoint::new(10, 5), &ring), RingPosition::OnBoundary);
        assert_eq!(point_in_ring(&ScaledPoint::new(0, 0), &ring), RingPosition::OnBoundary);

        let mut reversed = ring.clone();
        reversed.reverse();
        assert_eq!(point_in_ring(&ScaledPoint::new(5, 5), &reversed), RingPosition::Inside);
    }

    #[test]
    fn path_set_area_follows_orientation() {
        let mut ring = square_path(0, 0, 10);
        assert_eq!(path_set_area(&[ring.clone()]), 100.0);
        ring.reverse();
        assert_eq!(path_set_area(&[ring]), -100.0);
        assert_eq!(path_set_area(&[ScaledPath::new(vec![])]), 0.0);
    }

    #[test]
    fn large_region_area_is_exact() {
        // 100 x 100 tile units at the default scale
        let scale = FixedPointScale::default();
        let side = 10_000_000_000;
        let regions = into_regions(
            difference(
                &[square_path(0, 0, side)],
                &[square_path(side / 4, side / 4, side / 4)],
            )
            .unwrap(),
        );

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area(), 1e20 - 1e20 / 16.0);
        assert_eq!(scale.area_to_planar(regions[0].area()), 10000.0 - 625.0);
    }

    #[test]
    fn region_paths_orients_rings() {
        let mut outer = square_path(0, 0, 30);
        outer.reverse();
        let hole = square_path(10, 10, 10);
        let degenerate = ScaledPath::new(vec![ScaledPoint::new(1, 1), ScaledPoint::new(2, 2)]);

        let paths = region_paths(&ScaledRegion::new(outer, vec![hole, degenerate]));
        assert_eq!(paths.len(), 2);
        assert!(paths[0].area_signed() > 0.0);
        assert!(paths[1].area_signed() < 0.0);
        assert_eq!(path_set_area(&paths), 800.0);
    }

    #[test]
    fn inflate_with_square_caps() {
        let line = vec![ScaledPoint::new(0, 0), ScaledPoint::new(1000, 0)];
        let ribbon = inflate_open(&[line], 100.0, 2.0);
        assert_abs_diff_eq!(path_set_area(&ribbon), 1200.0 * 200.0, epsilon = 1000.0);
        assert!(inflate_open(&[], 100.0, 2.0).is_empty());
    }
}
