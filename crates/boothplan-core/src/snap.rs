//! Grid snapping.
//!
//! The grid unit is one foot expressed in layout pixels. Dragging and
//! dropping go through the same functions so a placed booth never lands
//! off-grid relative to a dragged one.

use crate::model::FloorPlanConfig;
use kurbo::Point;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// `round(value / grid) * grid`; a no-op for a non-positive or non-finite grid.
pub fn snap(value: f64, grid: f64) -> f64 {
    if !(grid.is_finite() && grid > 0.0) {
        return value;
    }
    (value / grid).round() * grid
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return SnapResult::none(point);
    }
    SnapResult {
        point: Point::new(snap(point.x, grid_size), snap(point.y, grid_size)),
        snapped_x: true,
        snapped_y: true,
    }
}

/// Snap to an optional grid; uncalibrated plans have none.
pub fn snap_point(point: Point, grid_size: Option<f64>) -> SnapResult {
    match grid_size {
        Some(grid) => snap_to_grid(point, grid),
        None => SnapResult::none(point),
    }
}

/// The plan's grid unit: one foot in pixels, once calibrated.
pub fn grid_size(config: &FloorPlanConfig) -> Option<f64> {
    config.pixels_per_foot().filter(|ppf| ppf.is_finite() && *ppf > 0.0)
}
