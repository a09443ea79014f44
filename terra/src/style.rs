//! See [`StyleProvider`] and [`TerraStyle`].

use crate::color::ColorGradient;
use serde::{Deserialize, Serialize};

/// Terrain layers in the order of their priority, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Water bodies. Nothing is drawn over water.
    Water,
    /// Road ribbons of car roads.
    CarRoad,
    /// Road ribbons of walk roads.
    WalkRoad,
    /// Land cover surfaces.
    Surface,
    /// Whatever part of the tile is not claimed by other layers.
    Background,
}

impl LayerKind {
    /// All the layers in priority order.
    pub const ALL: [LayerKind; 5] = [
        LayerKind::Water,
        LayerKind::CarRoad,
        LayerKind::WalkRoad,
        LayerKind::Surface,
        LayerKind::Background,
    ];
}

/// Length in tile units or in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Length in tile units.
    Units(f64),
    /// Length in meters. Converted into tile units with [`crate::TerraConfig::units_per_meter`].
    Meters(f64),
}

impl Dimension {
    /// Length in tile units.
    pub fn to_units(self, units_per_meter: f64) -> f64 {
        match self {
            Dimension::Units(v) => v,
            Dimension::Meters(v) => v * units_per_meter,
        }
    }
}

/// Source of styling values for terrain layers.
///
/// `class` is the width class for road layers and the surface class id for surfaces. `lod` is the level of detail of
/// the tile being built.
pub trait StyleProvider {
    /// Full width of the roads of the given class.
    fn road_width(&self, layer: LayerKind, class: u32, lod: u32) -> Option<Dimension>;
    /// Color gradient of the layer. Gradient value `0` corresponds to the lowest configured elevation, `1` to the
    /// highest.
    fn gradient(&self, layer: LayerKind, class: Option<u32>, lod: u32) -> Option<ColorGradient>;
}

/// Serializable rule based style.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerraStyle {
    /// Rules are traversed in sequence. For each requested property the first rule that matches the layer, class and
    /// level of detail and defines the property is used.
    pub rules: Vec<StyleRule>,
    /// Gradient used for layers no rule defines a gradient for.
    #[serde(default)]
    pub default_gradient: ColorGradient,
}

/// One rule of [`TerraStyle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    /// Layer the rule applies to.
    pub layer: LayerKind,
    /// If set, only features of this class match the rule.
    #[serde(default)]
    pub class: Option<u32>,
    /// Minimum level of detail, inclusive.
    #[serde(default)]
    pub min_lod: Option<u32>,
    /// Maximum level of detail, inclusive.
    #[serde(default)]
    pub max_lod: Option<u32>,
    /// Road width.
    #[serde(default)]
    pub width: Option<Dimension>,
    /// Color gradient.
    #[serde(default)]
    pub gradient: Option<ColorGradient>,
}

impl StyleRule {
    fn matches(&self, layer: LayerKind, class: Option<u32>, lod: u32) -> bool {
        let class_check_passed = match (self.class, class) {
            (None, _) => true,
            (Some(expected), Some(class)) => expected == class,
            (Some(_), None) => false,
        };

        self.layer == layer
            && class_check_passed
            && self.min_lod.map_or(true, |min| lod >= min)
            && self.max_lod.map_or(true, |max| lod <= max)
    }
}

impl TerraStyle {
    /// Get the first rule matching the arguments for which `property` returns a value.
    fn find<T>(
        &self,
        layer: LayerKind,
        class: Option<u32>,
        lod: u32,
        property: impl Fn(&StyleRule) -> Option<T>,
    ) -> Option<T> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(layer, class, lod))
            .find_map(property)
    }
}

impl StyleProvider for TerraStyle {
    fn road_width(&self, layer: LayerKind, class: u32, lod: u32) -> Option<Dimension> {
        self.find(layer, Some(class), lod, |rule| rule.width)
    }

    fn gradient(&self, layer: LayerKind, class: Option<u32>, lod: u32) -> Option<ColorGradient> {
        self.find(layer, class, lod, |rule| rule.gradient.clone())
            .or_else(|| Some(self.default_gradient.clone()))
    }
}
