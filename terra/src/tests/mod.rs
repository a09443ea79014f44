//! Fixtures shared by the unit tests of the crate.

use crate::color::{Color, ColorGradient};
use crate::mesh::TerraVertex;
use crate::scale::{ScaledPath, ScaledPoint};
use crate::style::{Dimension, LayerKind, StyleRule, TerraStyle};


pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Counter-clockwise axis aligned rectangle in scaled units.
pub(crate) fn rect_path(x_min: i64, y_min: i64, x_max: i64, y_max: i64) -> ScaledPath {
    ScaledPath::new(vec![
        ScaledPoint::new(x_min, y_min),
        ScaledPoint::new(x_max, y_min),
        ScaledPoint::new(x_max, y_max),
        ScaledPoint::new(x_min, y_max),
    ])
}

/// Area of a mesh triangle in tile units.
pub(crate) fn triangle_area([a, b, c]: [&TerraVertex; 3]) -> f64 {
    let (ax, ay) = (a.position[0] as f64, a.position[1] as f64);
    let (bx, by) = (b.position[0] as f64, b.position[1] as f64);
    let (cx, cy) = (c.position[0] as f64, c.position[1] as f64);
    ((bx - ax) * (cy - ay) - (cx - ax) * (by - ay)).abs() / 2.0
}

/// Counter-clockwise square in scaled units.
pub(crate) fn square_path(x: i64, y: i64, size: i64) -> ScaledPath {
    rect_path(x, y, x + size, y + size)
}

pub(crate) const WATER_COLOR: Color = Color::rgba(0, 0, 255, 255);
pub(crate) const CAR_ROAD_COLOR: Color = Color::rgba(255, 0, 0, 255);
pub(crate) const WALK_ROAD_COLOR: Color = Color::rgba(255, 255, 0, 255);
pub(crate) const BACKGROUND_COLOR: Color = Color::rgba(0, 255, 0, 255);

/// Style with car road class 1 of width 2, walk road class 1 of width 1 and a solid color per layer.
pub(crate) fn test_style() -> TerraStyle {
    let rule = |layer, color| StyleRule {
        layer,
        class: None,
        min_lod: None,
        max_lod: None,
        width: None,
        gradient: Some(ColorGradient::solid(color)),
    };

    TerraStyle {
        rules: vec![
            StyleRule {
                class: Some(1),
                width: Some(Dimension::Units(2.0)),
                ..rule(LayerKind::CarRoad, CAR_ROAD_COLOR)
            },
            StyleRule {
                class: Some(1),
                width: Some(Dimension::Units(1.0)),
                ..rule(LayerKind::WalkRoad, WALK_ROAD_COLOR)
            },
            rule(LayerKind::Water, WATER_COLOR),
            rule(LayerKind::Background, BACKGROUND_COLOR),
        ],
        default_gradient: ColorGradient::solid(Color::GRAY),
    }
}
