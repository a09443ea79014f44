//! Removal of regions too small to be triangulated reliably.

use crate::scale::{FixedPointScale, ScaledPath, ScaledRegion};
use terra_types::cartesian::CartesianClosedContour;

/// Drops polygons and holes with area below a threshold.
#[derive(Debug, Clone, Copy)]
pub struct DegenerateFilter {
    min_area: f64,
    scale: FixedPointScale,
}

impl DegenerateFilter {
    /// Creates a new filter. `min_area` is in square tile units.
    pub fn new(min_area: f64, scale: FixedPointScale) -> Self {
        Self { min_area, scale }
    }

    /// Minimum area in square tile units.
    pub fn min_area(&self) -> f64 {
        self.min_area
    }

    /// Returns true if the absolute area of the ring is below the threshold.
    pub fn is_degenerate(&self, ring: &ScaledPath) -> bool {
        self.scale.area_to_planar(ring.area_signed().abs()) < self.min_area
    }

    /// Removes degenerate holes from every region, then removes regions with net area below the threshold.
    ///
    /// Returns the surviving regions and the number of removed fragments (regions and holes).
    pub fn apply(&self, regions: Vec<ScaledRegion>) -> (Vec<ScaledRegion>, usize) {
        let mut discarded = 0;
        let mut kept = Vec::with_capacity(regions.len());

        for mut region in regions {
            let holes_before = region.inner_contours.len();
            region.inner_contours.retain(|hole| !self.is_degenerate(hole));
            discarded += holes_before - region.inner_contours.len();

            let area = self.scale.area_to_planar(region.area());
            if area < self.min_area {
                log::trace!("Dropping degenerate region with area {area}");
                discarded += 1;
                continue;
            }

            kept.push(region);
        }

        (kept, discarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{rect_path, square_path};

    fn filter() -> DegenerateFilter {
        DegenerateFilter::new(0.001, FixedPointScale::new(1000.0).unwrap())
    }

    #[test]
    fn small_regions_are_dropped() {
        let filter = filter();
        // 10x10 scaled units = 0.0001 tile units²
        let tiny = ScaledRegion::from(square_path(0, 0, 10));
        let big = ScaledRegion::from(square_path(100, 100, 1000));

        let (kept, discarded) = filter.apply(vec![tiny, big.clone()]);
        assert_eq!(kept, vec![big]);
        assert_eq!(discarded, 1);
    }

    #[test]
    fn small_holes_are_dropped() {
        let filter = filter();
        let mut pinhole = square_path(500, 500, 10);
        pinhole.reverse();
        let mut hole = square_path(100, 100, 200);
        hole.reverse();

        let region = ScaledRegion::new(square_path(0, 0, 1000), vec![pinhole, hole.clone()]);
        let (kept, discarded) = filter.apply(vec![region]);

        assert_eq!(discarded, 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].inner_contours, vec![hole]);
    }

    #[test]
    fn thin_ring_is_dropped_by_net_area() {
        let filter = filter();
        // outer ring of 0.5 tile units², the hole leaves a strip of 0.0005 tile units²
        let mut hole = rect_path(0, 0, 500, 999);
        hole.reverse();
        let outer = rect_path(0, 0, 500, 1000);
        assert!(!filter.is_degenerate(&hole));
        assert!(!filter.is_degenerate(&outer));

        let (kept, discarded) = filter.apply(vec![ScaledRegion::new(outer, vec![hole])]);
        assert!(kept.is_empty());
        assert_eq!(discarded, 1);
    }

    #[test]
    fn threshold_is_exclusive() {
        let filter = filter();
        // 0.001 tile units² exactly
        let ring = rect_path(0, 0, 100, 10);
        assert!(!filter.is_degenerate(&ring));
        assert!(filter.is_degenerate(&rect_path(0, 0, 99, 10)));
    }
}
