use super::SurfaceClass;
use crate::clip::{self, PathSet};
use crate::scale::{FixedPointScale, ScaledRegion};
use crate::style::LayerKind;
use terra_types::cartesian::Point2d;
use terra_types::Polygon;

fn unclassified(
    regions: &[ScaledRegion],
) -> impl Iterator<Item = (Option<u32>, &ScaledRegion)> + '_ {
    regions.iter().map(|region| (None, region))
}

/// Disjoint regions of all the terrain layers of a tile.
#[derive(Debug, Clone)]
pub struct TerraLayers {
    pub(crate) scale: FixedPointScale,
    pub(crate) water: Vec<ScaledRegion>,
    pub(crate) car_roads: Vec<ScaledRegion>,
    pub(crate) walk_roads: Vec<ScaledRegion>,
    pub(crate) surfaces: Vec<(SurfaceClass, Vec<ScaledRegion>)>,
    pub(crate) background: Vec<ScaledRegion>,
    pub(crate) discarded: usize,
}

impl TerraLayers {
    /// Scale of the region coordinates.
    pub fn scale(&self) -> FixedPointScale {
        self.scale
    }

    /// Number of fragments dropped as degenerate.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Surface regions grouped by class, in priority order.
    pub fn surfaces(&self) -> &[(SurfaceClass, Vec<ScaledRegion>)] {
        &self.surfaces
    }

    /// Regions of the layer with their classes. Only surfaces have classes.
    pub fn regions(
        &self,
        layer: LayerKind,
    ) -> Box<dyn Iterator<Item = (Option<u32>, &ScaledRegion)> + '_> {
        match layer {
            LayerKind::Water => Box::new(unclassified(&self.water)),
            LayerKind::CarRoad => Box::new(unclassified(&self.car_roads)),
            LayerKind::WalkRoad => Box::new(unclassified(&self.walk_roads)),
            LayerKind::Surface => Box::new(self.surfaces.iter().flat_map(|(class, regions)| {
                regions.iter().map(move |region| (Some(class.id), region))
            })),
            LayerKind::Background => Box::new(unclassified(&self.background)),
        }
    }

    /// All regions of the tile in layer priority order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerKind, Option<u32>, &ScaledRegion)> + '_ {
        LayerKind::ALL.into_iter().flat_map(move |layer| {
            self.regions(layer)
                .map(move |(class, region)| (layer, class, region))
        })
    }

    /// Oriented rings of all the regions of the layer.
    pub fn paths(&self, layer: LayerKind) -> PathSet {
        self.regions(layer)
            .flat_map(|(_, region)| clip::region_paths(region))
            .collect()
    }

    /// Total area of the layer in square tile units.
    pub fn area(&self, layer: LayerKind) -> f64 {
        self.regions(layer)
            .map(|(_, region)| self.scale.area_to_planar(region.area()))
            .sum()
    }

    /// Regions of the layer in tile coordinates.
    pub fn planar_regions(&self, layer: LayerKind) -> Vec<Polygon<Point2d>> {
        self.regions(layer)
            .map(|(_, region)| region.cast_points(|p| self.scale.to_planar(p)))
            .collect()
    }
}
