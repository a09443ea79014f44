//! See [`TerraConfig`].

use crate::error::TerraError;
use crate::scale::{FixedPointScale, DEFAULT_SCALE};
use serde::{Deserialize, Serialize};

/// Default minimum area of a region, in square tile units.
pub const DEFAULT_MIN_AREA: f64 = 0.001;

/// Parameters of the compositing pipeline.
///
/// One configuration is shared by every tile of a session. Missing fields are filled with defaults when the
/// configuration is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerraConfig {
    /// Fixed point scale factor: tile units are multiplied by it before any boolean operation.
    pub scale: f64,
    /// Regions and holes with smaller area (in square tile units) are dropped before triangulation.
    pub min_area: f64,
    /// Miter limit of road ribbon joins, as a multiple of the half width.
    pub miter_limit: f64,
    /// Number of tile units in one meter. Used to resolve style widths given in meters.
    pub units_per_meter: f64,
    /// Elevation range mapped onto the `[0, 1]` gradient value of mesh vertices.
    pub elevation_range: [f64; 2],
    /// Tessellation tolerance in tile units.
    pub tessellation_tolerance: f32,
    /// Size of the elevation sampling grid in tile units.
    ///
    /// When set, every region is cut along a square grid aligned with the tile minimum corner before triangulation,
    /// so elevation is sampled at every grid node and grid line crossing inside the region, not only at the region
    /// corners. `None` triangulates regions as they are.
    pub grid_cell_size: Option<f64>,
}

impl Default for TerraConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            min_area: DEFAULT_MIN_AREA,
            miter_limit: 2.0,
            units_per_meter: 1.0,
            elevation_range: [0.0, 1000.0],
            tessellation_tolerance: 0.1,
            grid_cell_size: None,
        }
    }
}

impl TerraConfig {
    /// Checks that all the values are in their valid ranges.
    pub fn validate(&self) -> Result<(), TerraError> {
        self.fixed_point_scale()?;

        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(TerraError::InvalidConfig(format!(
                "min_area must be a non-negative number, got {}",
                self.min_area
            )));
        }

        if !self.miter_limit.is_finite() || self.miter_limit < 1.0 {
            return Err(TerraError::InvalidConfig(format!(
                "miter_limit must be at least 1, got {}",
                self.miter_limit
            )));
        }

        if !self.units_per_meter.is_finite() || self.units_per_meter <= 0.0 {
            return Err(TerraError::InvalidConfig(format!(
                "units_per_meter must be positive, got {}",
                self.units_per_meter
            )));
        }

        let [min, max] = self.elevation_range;
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(TerraError::InvalidConfig(format!(
                "elevation_range must be an increasing pair, got [{min}, {max}]"
            )));
        }

        if !self.tessellation_tolerance.is_finite() || self.tessellation_tolerance <= 0.0 {
            return Err(TerraError::InvalidConfig(format!(
                "tessellation_tolerance must be positive, got {}",
                self.tessellation_tolerance
            )));
        }

        if let Some(size) = self.grid_cell_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(TerraError::InvalidConfig(format!(
                    "grid_cell_size must be positive, got {size}"
                )));
            }
        }

        Ok(())
    }

    /// Fixed point scale built from [`TerraConfig::scale`].
    pub fn fixed_point_scale(&self) -> Result<FixedPointScale, TerraError> {
        FixedPointScale::new(self.scale)
    }

    /// Maps an elevation onto the `[0, 1]` gradient range.
    pub fn gradient_value(&self, elevation: f64) -> f64 {
        let [min, max] = self.elevation_range;
        ((elevation - min) / (max - min)).clamp(0.0, 1.0)
    }
}
