//! See [`Mesh`] and [`MeshAssembler`].

use crate::clip;
use crate::color::ColorGradient;
use crate::config::TerraConfig;
use crate::elevation::ElevationProvider;
use crate::error::TerraError;
use crate::scale::{FixedPointScale, ScaledPoint, ScaledRegion};
use crate::style::LayerKind;
use lyon::lyon_tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor, VertexBuffers,
};
use lyon::path::Path;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use terra_types::cartesian::{Point2d, Rect};

fn point(x: f64, y: f64) -> lyon::math::Point {
    lyon::math::Point::new(x as _, y as _)
}

/// Vertex of a terrain mesh.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
pub struct TerraVertex {
    /// Position relative to [`Mesh::origin`]: x, y and elevation.
    pub position: [f32; 3],
    /// RGBA color with channels in `[0, 1]`.
    pub color: [f32; 4],
    /// Elevation normalized over [`TerraConfig::elevation_range`].
    pub gradient: f32,
}

/// Part of a mesh produced from one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    /// Layer of the region.
    pub layer: LayerKind,
    /// Class of the region, if the layer has classes.
    pub class: Option<u32>,
    /// Range of the region vertices in [`Mesh::buffers`].
    pub vertex_range: Range<usize>,
    /// Range of the region indices in [`Mesh::buffers`].
    pub index_range: Range<usize>,
}

/// Triangulated terrain of one tile.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Name of the mesh: `terrain:{z}/{x}/{y}`.
    pub name: String,
    /// Tile coordinates of the point all vertex positions are relative to.
    pub origin: Point2d,
    /// Vertices and triangle indices.
    pub buffers: VertexBuffers<TerraVertex, u32>,
    /// Regions of the mesh in the order they were added.
    pub regions: Vec<RegionInfo>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new(name: impl Into<String>, origin: Point2d) -> Self {
        Self {
            name: name.into(),
            origin,
            buffers: VertexBuffers::new(),
            regions: Vec::new(),
        }
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.buffers.indices.len() / 3
    }

    /// Returns true if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.buffers.indices.is_empty()
    }

    /// Iterates over the triangles of the region as triples of vertices.
    pub fn region_triangles<'a>(
        &'a self,
        region: &'a RegionInfo,
    ) -> impl Iterator<Item = [&'a TerraVertex; 3]> + 'a {
        self.buffers.indices[region.index_range.clone()]
            .chunks_exact(3)
            .map(|triangle| {
                [
                    &self.buffers.vertices[triangle[0] as usize],
                    &self.buffers.vertices[triangle[1] as usize],
                    &self.buffers.vertices[triangle[2] as usize],
                ]
            })
    }
}

struct TerraVertexConstructor<'a> {
    origin: Point2d,
    elevation: &'a dyn ElevationProvider,
    gradient: &'a ColorGradient,
    config: &'a TerraConfig,
}

impl FillVertexConstructor<TerraVertex> for TerraVertexConstructor<'_> {
    fn new_vertex(&mut self, vertex: FillVertex) -> TerraVertex {
        let position = vertex.position();
        let planar = Point2d::new(
            self.origin.x + position.x as f64,
            self.origin.y + position.y as f64,
        );

        let elevation = self.elevation.elevation(&planar);
        let gradient = self.config.gradient_value(elevation);

        TerraVertex {
            position: [position.x, position.y, elevation as f32],
            color: self.gradient.evaluate(gradient).to_f32_array(),
            gradient: gradient as f32,
        }
    }
}

/// Triangulates regions and collects them into a [`Mesh`].
///
/// With [`TerraConfig::grid_cell_size`] set, regions are cut into grid cells first and every cell is triangulated
/// separately, which places vertices on the grid.
pub struct MeshAssembler<'a> {
    mesh: Mesh,
    scale: FixedPointScale,
    scaled_origin: ScaledPoint,
    grid_step: Option<i64>,
    config: &'a TerraConfig,
    elevation: &'a dyn ElevationProvider,
    tessellator: FillTessellator,
}

impl std::fmt::Debug for MeshAssembler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshAssembler").finish_non_exhaustive()
    }
}

impl<'a> MeshAssembler<'a> {
    /// Creates an assembler for an empty mesh with the given name and origin.
    pub fn new(
        name: impl Into<String>,
        origin: Point2d,
        config: &'a TerraConfig,
        elevation: &'a dyn ElevationProvider,
    ) -> Result<Self, TerraError> {
        let scale = config.fixed_point_scale()?;
        let scaled_origin = scale.to_scaled(&origin)?;
        let grid_step = config
            .grid_cell_size
            .map(|size| grid_step(&scale, size))
            .transpose()?;

        Ok(Self {
            mesh: Mesh::new(name, origin),
            scale,
            scaled_origin,
            grid_step,
            config,
            elevation,
            tessellator: FillTessellator::new(),
        })
    }

    /// Triangulates the region together with its holes and appends the result to the mesh.
    pub fn add_region(
        &mut self,
        layer: LayerKind,
        class: Option<u32>,
        region: &ScaledRegion,
        gradient: &ColorGradient,
    ) -> Result<(), TerraError> {
        let start_vertex = self.mesh.buffers.vertices.len();
        let start_index = self.mesh.buffers.indices.len();

        match self.grid_step {
            Some(step) => {
                let cells = self.grid_cells(region, step)?;
                log::trace!("{layer:?} region is cut into {} grid cells", cells.len());
                for cell in &cells {
                    self.tessellate(layer, cell, gradient)?;
                }
            }
            None => self.tessellate(layer, region, gradient)?,
        }

        let buffers = &self.mesh.buffers;
        let end_index = buffers.indices.len();
        if end_index == start_index {
            log::trace!("{layer:?} region produced no triangles");
            return Ok(());
        }

        self.mesh.regions.push(RegionInfo {
            layer,
            class,
            vertex_range: start_vertex..buffers.vertices.len(),
            index_range: start_index..end_index,
        });

        Ok(())
    }

    /// Finished mesh.
    pub fn finish(self) -> Mesh {
        self.mesh
    }

    fn tessellate(
        &mut self,
        layer: LayerKind,
        region: &ScaledRegion,
        gradient: &ColorGradient,
    ) -> Result<(), TerraError> {
        let path = self.region_path(region);

        let vertex_constructor = TerraVertexConstructor {
            origin: self.mesh.origin,
            elevation: self.elevation,
            gradient,
            config: self.config,
        };

        self.tessellator
            .tessellate_path(
                &path,
                &FillOptions::DEFAULT.with_tolerance(self.config.tessellation_tolerance),
                &mut BuffersBuilder::new(&mut self.mesh.buffers, vertex_constructor),
            )
            .map_err(|err| TerraError::Tessellation(format!("{layer:?} region: {err:?}")))?;

        Ok(())
    }

    /// Parts of the region inside the grid cells it overlaps. Cells are aligned with the mesh origin.
    fn grid_cells(&self, region: &ScaledRegion, step: i64) -> Result<Vec<ScaledRegion>, TerraError> {
        let Some(bounds) = Rect::from_points(region.outer_contour().iter_points()) else {
            return Ok(Vec::new());
        };

        let paths = clip::region_paths(region);
        let first_line = |min: i64, origin: i64| origin + (min - origin).div_euclid(step) * step;

        let mut cells = Vec::new();
        let mut y = first_line(bounds.y_min, self.scaled_origin.y);
        while y < bounds.y_max {
            let mut x = first_line(bounds.x_min, self.scaled_origin.x);
            while x < bounds.x_max {
                let cell = Rect::new(x, y, x.saturating_add(step), y.saturating_add(step));
                cells.extend(clip::into_regions(clip::intersection(
                    &paths,
                    &[cell.into_contour()],
                )?));
                x = x.saturating_add(step);
            }
            y = y.saturating_add(step);
        }

        Ok(cells)
    }

    fn region_path(&self, region: &ScaledRegion) -> Path {
        let factor = self.scale.factor();
        let origin = self.scaled_origin;
        let local = |p: &ScaledPoint| {
            point(
                (p.x - origin.x) as f64 / factor,
                (p.y - origin.y) as f64 / factor,
            )
        };

        let mut path_builder = Path::builder();
        for contour in region.iter_contours() {
            let mut iterator = contour.iter_points();
            let Some(first_point) = iterator.next() else {
                continue;
            };

            let _ = path_builder.begin(local(first_point));
            for p in iterator {
                let _ = path_builder.line_to(local(p));
            }
            path_builder.end(true);
        }

        path_builder.build()
    }
}

fn grid_step(scale: &FixedPointScale, size: f64) -> Result<i64, TerraError> {
    let step = scale.scale_length(size)?.round();
    if step < 1.0 {
        return Err(TerraError::InvalidConfig(format!(
            "grid_cell_size {size} is below the fixed point resolution {}",
            1.0 / scale.factor()
        )));
    }

    Ok(step as i64)
}
