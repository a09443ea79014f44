//! Building of terrain meshes from tile vector data.
//!
//! [`TerraBuilder`] collects the geometries of one tile and runs the compositing pipeline over them:
//!
//! 1. all coordinates are converted into fixed point with the configured scale;
//! 2. road center lines are turned into ribbons;
//! 3. layers are composed in priority order `water > car roads > walk roads > surfaces > background` by
//!    [`TerraContext`];
//! 4. polygons with holes are restored and degenerate fragments are dropped;
//! 5. remaining regions are triangulated into one [`Mesh`].
//!
//! A builder holds no state besides its inputs, so one builder can be used to build several tiles, and
//! several builders can run on different threads at the same time.

use crate::clip::{self, PathSet};
use crate::color::ColorGradient;
use crate::config::TerraConfig;
use crate::elevation::ElevationProvider;
use crate::error::TerraError;
use crate::filter::DegenerateFilter;
use crate::mesh::{Mesh, MeshAssembler};
use crate::offset::RoadOffsetter;
use crate::scale::{FixedPointScale, ScaledPath};
use crate::style::{LayerKind, StyleProvider};
use crate::tile::TileIndex;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use terra_types::cartesian::{CartesianClosedContour, CartesianPoint2dFloat, Point2d, Rect};
use terra_types::{Contour, Polygon};

mod context;
mod layers;

pub use context::TerraContext;
pub use layers::TerraLayers;

/// Land cover class with its priority.
///
/// Where surfaces of different classes overlap, the class with the higher priority takes the area. Classes with equal
/// priority are ordered by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceClass {
    /// Class id. Passed to the style provider to select the surface color.
    pub id: u32,
    /// Priority of the class.
    pub priority: i32,
}

impl SurfaceClass {
    /// Creates a new surface class.
    pub fn new(id: u32, priority: i32) -> Self {
        Self { id, priority }
    }
}

impl Ord for SurfaceClass {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for SurfaceClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Tile specific arguments of a build.
#[derive(Clone, Copy)]
pub struct BuilderContext<'a> {
    /// Index of the tile. Its `z` is used as level of detail for style lookups.
    pub index: TileIndex,
    /// Bounds of the tile in tile coordinates. Everything outside is cut off.
    pub bounds: Rect,
    /// Source of road widths and layer colors.
    pub style: &'a dyn StyleProvider,
    /// Source of vertex elevation.
    pub elevation: &'a dyn ElevationProvider,
}

/// Collects vector data of a tile and composes it into terrain layers.
#[derive(Debug, Clone)]
pub struct TerraBuilder {
    config: TerraConfig,
    water: Vec<Polygon<Point2d>>,
    car_roads: BTreeMap<u32, Vec<Contour<Point2d>>>,
    walk_roads: BTreeMap<u32, Vec<Contour<Point2d>>>,
    surfaces: BTreeMap<SurfaceClass, Vec<Polygon<Point2d>>>,
    surface_priorities: HashMap<u32, i32>,
}

impl TerraBuilder {
    /// Creates an empty builder. Fails if the configuration is not valid.
    pub fn new(config: TerraConfig) -> Result<Self, TerraError> {
        config.validate()?;
        Ok(Self {
            config,
            water: Vec::new(),
            car_roads: BTreeMap::new(),
            walk_roads: BTreeMap::new(),
            surfaces: BTreeMap::new(),
            surface_priorities: HashMap::new(),
        })
    }

    /// Configuration of the builder.
    pub fn config(&self) -> &TerraConfig {
        &self.config
    }

    /// Adds a water polygon.
    pub fn add_water(&mut self, polygon: Polygon<Point2d>) {
        self.water.push(polygon);
    }

    /// Adds a car road center line of the given width class.
    pub fn add_car_road(&mut self, class: u32, line: Contour<Point2d>) {
        self.car_roads.entry(class).or_default().push(line);
    }

    /// Adds a walk road center line of the given width class.
    pub fn add_walk_road(&mut self, class: u32, line: Contour<Point2d>) {
        self.walk_roads.entry(class).or_default().push(line);
    }

    /// Adds a land cover polygon. Every class id can only be used with one priority.
    pub fn add_surface(
        &mut self,
        class: SurfaceClass,
        polygon: Polygon<Point2d>,
    ) -> Result<(), TerraError> {
        let priority = *self
            .surface_priorities
            .entry(class.id)
            .or_insert(class.priority);
        if priority != class.priority {
            return Err(TerraError::ConflictingSurfacePriority(class.id));
        }

        self.surfaces.entry(class).or_default().push(polygon);
        Ok(())
    }

    /// Composes the layers of the tile.
    pub fn compose(&self, context: &BuilderContext) -> Result<TerraLayers, TerraError> {
        let scale = self.config.fixed_point_scale()?;
        let lod = context.index.z;

        let car_widths = self.road_widths(context, LayerKind::CarRoad, &self.car_roads)?;
        let walk_widths = self.road_widths(context, LayerKind::WalkRoad, &self.walk_roads)?;
        let max_width = car_widths
            .values()
            .chain(walk_widths.values())
            .fold(0.0f64, |max, width| max.max(*width));

        self.check_bounds(&scale, &context.bounds, max_width)?;

        log::debug!(
            "Composing tile {} (lod {lod}): {} water polygons, {} car road classes, {} walk road classes, {} surface classes",
            context.index,
            self.water.len(),
            self.car_roads.len(),
            self.walk_roads.len(),
            self.surfaces.len()
        );

        let tile = ScaledPath::new(
            context
                .bounds
                .into_quadrangle()
                .iter()
                .map(|p| scale.to_scaled(p))
                .collect::<Result<_, _>>()?,
        );
        if tile.double_area_signed() <= 0 {
            return Err(TerraError::InvalidGeometry(format!(
                "tile {} bounds have no area at scale {}",
                context.index,
                scale.factor()
            )));
        }

        let offsetter = RoadOffsetter::new(scale, self.config.miter_limit);
        let car_ribbons = offsetter.build(
            self.car_roads.iter().map(|(class, lines)| (*class, lines.iter())),
            |class| width_of(&car_widths, LayerKind::CarRoad, class),
        )?;
        let walk_ribbons = offsetter.build(
            self.walk_roads.iter().map(|(class, lines)| (*class, lines.iter())),
            |class| width_of(&walk_widths, LayerKind::WalkRoad, class),
        )?;

        let water = self.scale_polygons(&scale, &self.water)?;
        let surfaces = self
            .surfaces
            .iter()
            .map(|(class, polygons)| Ok((*class, self.scale_polygons(&scale, polygons)?)))
            .collect::<Result<Vec<_>, TerraError>>()?;

        let mut terra_context = TerraContext::new(tile, scale);
        terra_context.build_water(&water)?;
        terra_context.build_roads(&car_ribbons, &walk_ribbons)?;
        terra_context.build_surfaces(
            surfaces
                .iter()
                .map(|(class, paths)| (*class, paths.as_slice())),
        )?;
        terra_context.build_background()?;

        let filter = DegenerateFilter::new(self.config.min_area, scale);
        Ok(terra_context.into_layers(&filter))
    }

    /// Composes the layers of the tile, triangulates them and passes the resulting mesh to `mesh_callback`.
    ///
    /// The callback is called exactly once if the build succeeds, and is not called if it fails.
    pub fn build(
        &self,
        context: &BuilderContext,
        mesh_callback: impl FnOnce(Mesh),
    ) -> Result<(), TerraError> {
        let layers = self.compose(context)?;
        let lod = context.index.z;

        let origin = Point2d::new(context.bounds.x_min, context.bounds.y_min);
        let mut assembler = MeshAssembler::new(
            format!("terrain:{}", context.index),
            origin,
            &self.config,
            context.elevation,
        )?;

        let mut gradients: HashMap<(LayerKind, Option<u32>), ColorGradient> = HashMap::new();
        for (layer, class, region) in layers.iter() {
            let gradient = gradients.entry((layer, class)).or_insert_with(|| {
                context.style.gradient(layer, class, lod).unwrap_or_else(|| {
                    log::warn!("No gradient for {layer:?} class {class:?}, using default");
                    ColorGradient::default()
                })
            });

            assembler.add_region(layer, class, region, gradient)?;
        }

        let mesh = assembler.finish();
        log::debug!(
            "Built mesh {}: {} regions, {} triangles",
            mesh.name,
            mesh.regions.len(),
            mesh.triangle_count()
        );

        mesh_callback(mesh);
        Ok(())
    }

    fn road_widths(
        &self,
        context: &BuilderContext,
        layer: LayerKind,
        roads: &BTreeMap<u32, Vec<Contour<Point2d>>>,
    ) -> Result<HashMap<u32, f64>, TerraError> {
        roads
            .keys()
            .map(|&class| {
                let width = context
                    .style
                    .road_width(layer, class, context.index.z)
                    .ok_or(TerraError::MissingRoadWidth { layer, class })?
                    .to_units(self.config.units_per_meter);

                if !width.is_finite() || width <= 0.0 {
                    return Err(TerraError::InvalidRoadWidth {
                        layer,
                        class,
                        width,
                    });
                }

                Ok((class, width))
            })
            .collect()
    }

    fn check_bounds(
        &self,
        scale: &FixedPointScale,
        bounds: &Rect,
        max_road_width: f64,
    ) -> Result<(), TerraError> {
        let corners = [bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max];
        if corners.iter().any(|v| !v.is_finite()) || bounds.is_empty() {
            return Err(TerraError::InvalidGeometry(format!(
                "tile bounds must be finite and non-empty, got {bounds:?}"
            )));
        }

        // ribbon corners stick out from the center line by up to miter limit half widths
        let margin = max_road_width / 2.0 * self.config.miter_limit.max(std::f64::consts::SQRT_2);
        scale.check_bounds(bounds, margin)
    }

    fn scale_polygons(
        &self,
        scale: &FixedPointScale,
        polygons: &[Polygon<Point2d>],
    ) -> Result<PathSet, TerraError> {
        let mut paths = PathSet::new();
        for polygon in polygons {
            if let Some(point) = polygon
                .iter_contours()
                .flat_map(|contour| contour.iter_points())
                .find(|p| !CartesianPoint2dFloat::is_finite(*p))
            {
                return Err(TerraError::InvalidGeometry(format!(
                    "polygon has a non-finite point ({}, {})",
                    point.x, point.y
                )));
            }

            let mut scaled = polygon.try_cast_points(|p| scale.to_scaled(p))?;
            scaled.outer_contour.dedup();
            for hole in &mut scaled.inner_contours {
                hole.dedup();
            }

            let region_paths = clip::region_paths(&scaled);
            if region_paths.is_empty() {
                log::trace!("Skipping polygon without area");
            }
            paths.extend(region_paths);
        }

        Ok(paths)
    }
}

fn width_of(widths: &HashMap<u32, f64>, layer: LayerKind, class: u32) -> Result<f64, TerraError> {
    widths
        .get(&class)
        .copied()
        .ok_or(TerraError::MissingRoadWidth { layer, class })
}
