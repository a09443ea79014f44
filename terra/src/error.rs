//! Error types used by the crate.

use crate::clip::BooleanOp;
use crate::style::LayerKind;
use thiserror::Error;

/// Terra error type.
///
/// All errors are local to the tile being processed: a failed tile produces no mesh and leaves other tiles intact.
#[derive(Debug, Error)]
pub enum TerraError {
    /// Fixed point scale factor is not a finite positive number.
    #[error("invalid fixed point scale: {0}")]
    InvalidScale(f64),
    /// A coordinate does not fit into the integer range of the clipping engine at the configured scale.
    #[error("coordinate {value} cannot be represented with scale {scale}")]
    PrecisionOverflow {
        /// Offending value in tile units.
        value: f64,
        /// Scale factor in use.
        scale: f64,
    },
    /// Input geometry rejected at the layer build boundary.
    #[error("invalid input geometry: {0}")]
    InvalidGeometry(String),
    /// Configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Style does not define a width for a road class.
    #[error("no width is defined for {layer:?} class {class}")]
    MissingRoadWidth {
        /// Road layer.
        layer: LayerKind,
        /// Width class of the road.
        class: u32,
    },
    /// Resolved road width is not a finite positive number.
    #[error("invalid width {width} for {layer:?} class {class}")]
    InvalidRoadWidth {
        /// Road layer.
        layer: LayerKind,
        /// Width class of the road.
        class: u32,
        /// Resolved width in tile units.
        width: f64,
    },
    /// The same surface class was registered with different priorities.
    #[error("surface class {0} is registered with conflicting priorities")]
    ConflictingSurfacePriority(u32),
    /// Clipping engine failed to execute a boolean operation.
    #[error("{op} operation failed")]
    BooleanOperation {
        /// Operation that failed.
        op: BooleanOp,
        /// Error reported by the clipping engine.
        #[source]
        source: clipper2::ClipperError,
    },
    /// Triangulation of a region failed.
    #[error("tessellation failed: {0}")]
    Tessellation(String),
}
