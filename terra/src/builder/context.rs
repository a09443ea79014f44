use super::layers::TerraLayers;
use super::SurfaceClass;
use crate::clip::{self, PathSet};
use crate::error::TerraError;
use crate::filter::DegenerateFilter;
use crate::scale::{FixedPointScale, ScaledPath};

/// Accumulator of one compositing pass over a tile.
///
/// Layers must be built in priority order: [`TerraContext::build_water`], [`TerraContext::build_roads`],
/// [`TerraContext::build_surfaces`], [`TerraContext::build_background`]. Every step subtracts everything claimed by
/// the previous steps, so the resulting layers never overlap.
#[derive(Debug, Clone)]
pub struct TerraContext {
    tile: ScaledPath,
    scale: FixedPointScale,
    water: PathSet,
    car_roads: PathSet,
    walk_roads: PathSet,
    surfaces: Vec<(SurfaceClass, PathSet)>,
    background: PathSet,
}

impl TerraContext {
    /// Creates an empty context for the tile with the given boundary.
    pub fn new(tile: ScaledPath, scale: FixedPointScale) -> Self {
        Self {
            tile,
            scale,
            water: PathSet::new(),
            car_roads: PathSet::new(),
            walk_roads: PathSet::new(),
            surfaces: Vec::new(),
            background: PathSet::new(),
        }
    }

    /// Merges water polygons and clips them to the tile.
    pub fn build_water(&mut self, water: &[ScaledPath]) -> Result<(), TerraError> {
        let merged = clip::union(water)?;
        self.water = self.clip_to_tile(&merged)?;

        log::debug!(
            "Water: {} input rings, {} rings after clipping",
            water.len(),
            self.water.len()
        );
        Ok(())
    }

    /// Car roads take the area of road ribbons not covered with water. Walk roads additionally give way to car
    /// roads.
    pub fn build_roads(
        &mut self,
        car_ribbons: &[ScaledPath],
        walk_ribbons: &[ScaledPath],
    ) -> Result<(), TerraError> {
        let walk_extruded = clip::difference(walk_ribbons, car_ribbons)?;

        self.car_roads = self.clip_to_tile(&clip::difference(car_ribbons, &self.water)?)?;
        self.walk_roads = self.clip_to_tile(&clip::difference(&walk_extruded, &self.water)?)?;

        log::debug!(
            "Roads: {} car road rings, {} walk road rings",
            self.car_roads.len(),
            self.walk_roads.len()
        );
        Ok(())
    }

    /// Adds surface classes one by one. A class only takes the area not claimed by water, roads or any surface
    /// class added before it, so classes must come in priority order.
    pub fn build_surfaces<'a>(
        &mut self,
        classes: impl IntoIterator<Item = (SurfaceClass, &'a [ScaledPath])>,
    ) -> Result<(), TerraError> {
        for (class, paths) in classes {
            let merged = clip::union(paths)?;
            let remaining = clip::difference(&merged, &self.claimed())?;
            let clipped = self.clip_to_tile(&remaining)?;

            log::debug!(
                "Surface class {} (priority {}): {} rings",
                class.id,
                class.priority,
                clipped.len()
            );

            if !clipped.is_empty() {
                self.surfaces.push((class, clipped));
            }
        }

        Ok(())
    }

    /// Background is the part of the tile not claimed by any other layer.
    pub fn build_background(&mut self) -> Result<(), TerraError> {
        self.background = clip::difference(std::slice::from_ref(&self.tile), &self.claimed())?;
        log::debug!("Background: {} rings", self.background.len());
        Ok(())
    }

    /// Reconstructs polygons with holes for every layer and removes degenerate ones.
    pub fn into_layers(self, filter: &DegenerateFilter) -> TerraLayers {
        let mut discarded = 0;
        let mut regions = |paths: PathSet| {
            let (kept, count) = filter.apply(clip::into_regions(paths));
            discarded += count;
            kept
        };

        let water = regions(self.water);
        let car_roads = regions(self.car_roads);
        let walk_roads = regions(self.walk_roads);
        let surfaces = self
            .surfaces
            .into_iter()
            .map(|(class, paths)| (class, regions(paths)))
            .filter(|(_, regions)| !regions.is_empty())
            .collect();
        let background = regions(self.background);

        if discarded > 0 {
            log::debug!(
                "Discarded {discarded} fragments with area below {}",
                filter.min_area()
            );
        }

        TerraLayers {
            scale: self.scale,
            water,
            car_roads,
            walk_roads,
            surfaces,
            background,
            discarded,
        }
    }

    fn claimed(&self) -> PathSet {
        self.water
            .iter()
            .chain(&self.car_roads)
            .chain(&self.walk_roads)
            .chain(self.surfaces.iter().flat_map(|(_, paths)| paths))
            .cloned()
            .collect()
    }

    fn clip_to_tile(&self, paths: &[ScaledPath]) -> Result<PathSet, TerraError> {
        clip::intersection(paths, std::slice::from_ref(&self.tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{intersection, path_set_area};
    use crate::tests::{rect_path, square_path};

    fn context() -> TerraContext {
        TerraContext::new(square_path(0, 0, 100), FixedPointScale::new(10.0).unwrap())
    }

    fn overlap(a: &[ScaledPath], b: &[ScaledPath]) -> f64 {
        path_set_area(&intersection(a, b).unwrap())
    }

    #[test]
    fn water_is_merged_and_clipped() {
        let mut context = context();
        context
            .build_water(&[square_path(-10, -10, 30), square_path(10, 10, 30)])
            .unwrap();

        // 20x20 inside the tile plus 30x30 minus the 10x10 overlap
        assert_eq!(path_set_area(&context.water), 400.0 + 900.0 - 100.0);
    }

    #[test]
    fn roads_give_way_to_water_and_car_roads() {
        let mut context = context();
        context.build_water(&[square_path(40, 0, 20)]).unwrap();
        context
            .build_roads(&[rect_path(0, 10, 100, 20)], &[rect_path(50, -10, 60, 110)])
            .unwrap();

        // car road minus the 20x10 water crossing
        assert_eq!(path_set_area(&context.car_roads), 1000.0 - 200.0);
        // walk road inside the tile, minus water (10x20) and minus the car road crossing (10x10, already in water)
        assert_eq!(path_set_area(&context.walk_roads), 1000.0 - 200.0);

        assert_eq!(overlap(&context.car_roads, &context.water), 0.0);
        assert_eq!(overlap(&context.walk_roads, &context.water), 0.0);
        assert_eq!(overlap(&context.walk_roads, &context.car_roads), 0.0);
    }

    #[test]
    fn surfaces_follow_class_order() {
        let mut context = context();
        let forest = SurfaceClass::new(1, 10);
        let grass = SurfaceClass::new(2, 5);
        let forest_paths = [square_path(0, 0, 60)];
        let grass_paths = [square_path(40, 40, 60)];

        context.build_water(&[]).unwrap();
        context.build_roads(&[], &[]).unwrap();
        context
            .build_surfaces([
                (forest, forest_paths.as_slice()),
                (grass, grass_paths.as_slice()),
            ])
            .unwrap();

        assert_eq!(context.surfaces.len(), 2);
        assert_eq!(context.surfaces[0].0, forest);
        assert_eq!(path_set_area(&context.surfaces[0].1), 3600.0);
        assert_eq!(path_set_area(&context.surfaces[1].1), 3600.0 - 400.0);
    }

    #[test]
    fn background_fills_the_rest() {
        let mut context = context();
        context.build_water(&[square_path(10, 10, 20)]).unwrap();
        context.build_roads(&[rect_path(0, 50, 100, 60)], &[]).unwrap();
        context
            .build_surfaces([(SurfaceClass::new(1, 0), [square_path(70, 70, 50)].as_slice())])
            .unwrap();
        context.build_background().unwrap();

        let claimed = path_set_area(&context.claimed());
        let background = path_set_area(&context.background);
        assert_eq!(claimed, 400.0 + 1000.0 + 900.0);
        assert_eq!(claimed + background, 10000.0);
        assert_eq!(overlap(&context.background, &context.claimed()), 0.0);
    }

    #[test]
    fn empty_tile_is_background() {
        let mut context = context();
        context.build_water(&[]).unwrap();
        context.build_roads(&[], &[]).unwrap();
        context.build_surfaces([]).unwrap();
        context.build_background().unwrap();

        let layers = context.into_layers(&DegenerateFilter::new(0.001, FixedPointScale::new(10.0).unwrap()));
        assert_eq!(layers.background.len(), 1);
        assert_eq!(layers.area(crate::style::LayerKind::Background), 100.0);
    }
}
