//! Screen to layout coordinate mapping.
//!
//! Calibration picks and booth drags both go through
//! [`CoordinateTransform::to_layout_space`]; nothing else converts pointer
//! positions.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Maps pointer positions on screen into the floor plan's layout pixels.
///
/// `origin` is where the drawing surface starts on screen, `scroll` is how
/// far its content has been scrolled or panned, and `zoom` is displayed
/// pixels per native layout pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTransform {
    pub origin: Point,
    pub scroll: Vec2,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            scroll: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.05,
            max_zoom: 20.0,
        }
    }
}

impl CoordinateTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2() - self.scroll) * Affine::scale(self.zoom)
    }

    /// Screen to layout.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(self.scroll - self.origin.to_vec2())
    }

    /// Convert a pointer position to layout space.
    pub fn to_layout_space(&self, screen: Point) -> Point {
        self.inverse_transform() * screen
    }

    /// Convert a layout point to screen space.
    pub fn to_screen_space(&self, layout: Point) -> Point {
        self.transform() * layout
    }

    /// Match the zoom to a surface showing `native` layout pixels at `displayed` size.
    pub fn set_display_size(&mut self, displayed: Size, native: Size) {
        if native.width > 0.0 && displayed.width > 0.0 {
            self.zoom = (displayed.width / native.width).clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// Move the content by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.scroll -= delta;
    }

    /// Zoom, keeping the layout point under `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let layout_point = self.to_layout_space(screen_point);
        self.zoom = new_zoom;

        let drift = self.to_screen_space(layout_point) - screen_point;
        self.scroll += drift;
    }

    /// Reset scroll and zoom.
    pub fn reset(&mut self) {
        self.scroll = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit an image of `image` size, centered, into a viewport.
    pub fn fit_to_image(&mut self, image: Size, viewport: Size, padding: f64) {
        if image.is_zero_area() {
            self.reset();
            return;
        }

        let available = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let zoom_x = available.width / image.width;
        let zoom_y = available.height / image.height;
        self.zoom = zoom_x.min(zoom_y).clamp(self.min_zoom, self.max_zoom);

        let image_center = Rect::from_origin_size(Point::ZERO, image).center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        // Screen position of the image center must land on the viewport center.
        self.scroll = Vec2::new(
            image_center.x * self.zoom - viewport_center.x,
            image_center.y * self.zoom - viewport_center.y,
        );
    }
}
