//! Terra turns the vector data of a map tile into a layered terrain mesh.
//!
//! The input of a tile is a set of water polygons, road center lines grouped by width class and land cover polygons
//! grouped by surface class. The output is one triangulated [`Mesh`] in which every point of the tile belongs to
//! exactly one of five layers:
//!
//! * water;
//! * car roads;
//! * walk roads;
//! * surfaces;
//! * background, which is whatever is left.
//!
//! # Quick start
//!
//! ```no_run
//! use terra::{BuilderContext, FlatElevation, TerraBuilder, TerraConfig, TerraStyle, TileIndex};
//! use terra::terra_types::cartesian::{Point2d, Rect};
//! use terra::terra_types::{Contour, Polygon};
//!
//! # fn load_style() -> TerraStyle { TerraStyle::default() }
//! let mut builder = TerraBuilder::new(TerraConfig::default())?;
//! builder.add_water(Polygon::from(vec![
//!     Point2d::new(2.0, 2.0),
//!     Point2d::new(4.0, 2.0),
//!     Point2d::new(4.0, 4.0),
//!     Point2d::new(2.0, 4.0),
//! ]));
//! builder.add_car_road(1, Contour::open(vec![Point2d::new(0.0, 5.0), Point2d::new(10.0, 5.0)]));
//!
//! let style = load_style();
//! let context = BuilderContext {
//!     index: TileIndex::new(0, 0, 14),
//!     bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
//!     style: &style,
//!     elevation: &FlatElevation(0.0),
//! };
//!
//! builder.build(&context, |mesh| println!("{}: {} triangles", mesh.name, mesh.triangle_count()))?;
//! # Ok::<(), terra::error::TerraError>(())
//! ```
//!
//! # Main components
//!
//! * [`scale`] converts coordinates into fixed point, which makes boolean operations exact;
//! * [`offset`] turns road center lines into ribbons;
//! * [`builder`] composes the layers in priority order;
//! * [`filter`] drops fragments too small to be triangulated;
//! * [`mesh`] triangulates the regions and samples elevation and colors for the vertices.
//!
//! Styling and elevation come from outside through the [`StyleProvider`] and [`ElevationProvider`] traits.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod builder;
pub mod clip;
mod color;
pub mod config;
pub mod elevation;
pub mod error;
pub mod filter;
pub mod mesh;
pub mod offset;
pub mod scale;
pub mod style;
mod tile;

#[cfg(test)]
pub(crate) mod tests;

pub use builder::{BuilderContext, SurfaceClass, TerraBuilder, TerraContext, TerraLayers};
pub use color::{Color, ColorGradient, GradientStop};
pub use config::TerraConfig;
pub use elevation::{ElevationProvider, FlatElevation};
pub use mesh::{Mesh, TerraVertex};
pub use style::{Dimension, LayerKind, StyleProvider, TerraStyle};
pub use terra_types;
pub use tile::TileIndex;
