//! The booth renderer: `FloorPlanConfig` × options → [`Drawing`].

use crate::drawing::{BoothMeta, DrawItem, Drawing, TextRole};
use boothplan_core::category::{AVAILABLE_COLOR, Rgba};
use boothplan_core::{Booth, BoothId, FloorPlanConfig};
use kurbo::{Point, Rect, Size};
use peniko::Color;

/// Message shown when no usable background is configured.
pub const PLACEHOLDER_MESSAGE: &str = "Floor plan not configured";

/// Fixed visual parameters shared by every view.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub min_font_size: f64,
    pub max_font_size: f64,
    /// Label font size as a fraction of the booth's shorter side.
    pub font_scale: f64,
    pub placeholder_size: Size,
    pub placeholder_fill: Color,
    pub placeholder_text: Color,
    pub grid_color: Color,
    pub grid_width: f64,
    /// Grids denser than this (pixels per foot) are not drawn.
    pub min_grid_spacing: f64,
    pub booth_stroke: Color,
    pub booth_stroke_width: f64,
    pub label_color: Color,
    pub selection_color: Color,
    pub selection_width: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            min_font_size: 10.0,
            max_font_size: 28.0,
            font_scale: 0.18,
            placeholder_size: Size::new(800.0, 600.0),
            placeholder_fill: Color::from_rgba8(243, 244, 246, 255),
            placeholder_text: Color::from_rgba8(107, 114, 128, 255),
            grid_color: Color::from_rgba8(200, 200, 200, 100),
            grid_width: 0.5,
            min_grid_spacing: 4.0,
            booth_stroke: Color::from_rgba8(55, 65, 81, 255),
            booth_stroke_width: 1.5,
            label_color: Color::from_rgba8(17, 24, 39, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            selection_width: 3.0,
        }
    }
}

impl RenderStyle {
    /// Label font size for a booth of the given pixel size.
    pub fn font_size(&self, width_px: f64, height_px: f64) -> f64 {
        (width_px.min(height_px) * self.font_scale).clamp(self.min_font_size, self.max_font_size)
    }
}

/// Options that distinguish the editor from the public viewer.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Attach booth metadata for click routing.
    pub interactive: bool,
    /// Reveal vendor names on booths.
    pub show_names: bool,
    /// Fill booths by category, else the neutral "available" fill.
    pub show_category_colors: bool,
    /// Overlay a one-foot grid once calibrated.
    pub show_grid: bool,
    /// Booth id text.
    pub show_labels: bool,
    /// Booth to outline as selected.
    pub selected: Option<BoothId>,
    pub style: RenderStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::editor()
    }
}

impl RenderOptions {
    /// Operator view: everything on.
    pub fn editor() -> Self {
        Self {
            interactive: true,
            show_names: true,
            show_category_colors: true,
            show_grid: true,
            show_labels: true,
            selected: None,
            style: RenderStyle::default(),
        }
    }

    /// Public view: read-only, no vendor names.
    pub fn public() -> Self {
        Self {
            interactive: false,
            show_names: false,
            show_category_colors: true,
            show_grid: false,
            show_labels: true,
            selected: None,
            style: RenderStyle::default(),
        }
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_names(mut self, show_names: bool) -> Self {
        self.show_names = show_names;
        self
    }

    pub fn with_category_colors(mut self, show: bool) -> Self {
        self.show_category_colors = show;
        self
    }

    pub fn with_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }

    pub fn with_labels(mut self, show_labels: bool) -> Self {
        self.show_labels = show_labels;
        self
    }

    pub fn with_selected(mut self, selected: Option<BoothId>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }
}

/// Render a floor plan.
///
/// Pure and deterministic. Without a usable background the result is the
/// placeholder drawing.
pub fn render(config: &FloorPlanConfig, options: &RenderOptions) -> Drawing {
    let (Some(reference), Some(size)) = (config.background_image_ref.as_deref(), config.image_size())
    else {
        return placeholder(&options.style);
    };

    let mut drawing = Drawing::new(size);
    drawing.push(DrawItem::Image {
        reference: reference.to_string(),
        rect: Rect::from_origin_size(Point::ZERO, size),
    });

    if options.show_grid {
        if let Some(ppf) = config.pixels_per_foot() {
            render_grid(&mut drawing, size, ppf, &options.style);
        }
    }

    for booth in config.booths() {
        render_booth(&mut drawing, booth, options);
    }

    drawing
}

/// The fixed "not configured" drawing.
pub fn placeholder(style: &RenderStyle) -> Drawing {
    let size = style.placeholder_size;
    let mut drawing = Drawing::new(size);
    drawing.push(DrawItem::Rect {
        rect: Rect::from_origin_size(Point::ZERO, size),
        fill: Some(Rgba::from(style.placeholder_fill)),
        stroke: None,
        stroke_width: 0.0,
        meta: None,
    });
    drawing.push(DrawItem::Text {
        position: Point::new(size.width / 2.0, size.height / 2.0),
        content: PLACEHOLDER_MESSAGE.to_string(),
        font_size: style.max_font_size,
        color: Rgba::from(style.placeholder_text),
        role: TextRole::Placeholder,
        meta: None,
    });
    drawing
}

fn render_grid(drawing: &mut Drawing, size: Size, grid_size: f64, style: &RenderStyle) {
    if grid_size < style.min_grid_spacing {
        log::debug!("Skipping grid: {:.2} px/ft is too dense", grid_size);
        return;
    }
    let color = Rgba::from(style.grid_color);

    // Vertical lines
    let mut x = grid_size;
    while x < size.width {
        drawing.push(DrawItem::Line {
            from: Point::new(x, 0.0),
            to: Point::new(x, size.height),
            color,
            width: style.grid_width,
        });
        x += grid_size;
    }

    // Horizontal lines
    let mut y = grid_size;
    while y < size.height {
        drawing.push(DrawItem::Line {
            from: Point::new(0.0, y),
            to: Point::new(size.width, y),
            color,
            width: style.grid_width,
        });
        y += grid_size;
    }
}

fn render_booth(drawing: &mut Drawing, booth: &Booth, options: &RenderOptions) {
    let style = &options.style;
    let rect = booth.rect();
    let meta = options.interactive.then(|| BoothMeta {
        booth_id: booth.id().to_string(),
    });
    let selected = options.selected.as_deref() == Some(booth.id());

    let fill = match booth.category {
        Some(category) if options.show_category_colors => category.color(),
        _ => AVAILABLE_COLOR,
    };
    let (stroke, stroke_width) = if selected {
        (style.selection_color, style.selection_width)
    } else {
        (style.booth_stroke, style.booth_stroke_width)
    };

    drawing.push(DrawItem::Rect {
        rect,
        fill: Some(fill),
        stroke: Some(Rgba::from(stroke)),
        stroke_width,
        meta: meta.clone(),
    });

    // Three fixed slots around the center; which slots are filled never
    // moves the others.
    let font_size = style.font_size(rect.width(), rect.height());
    let line_height = font_size * 1.2;
    let center = rect.center();
    let color = Rgba::from(style.label_color);
    let mut label = |offset: f64, content: String, role: TextRole| {
        drawing.push(DrawItem::Text {
            position: Point::new(center.x, center.y + offset),
            content,
            font_size,
            color,
            role,
            meta: meta.clone(),
        });
    };

    if options.show_labels {
        label(-line_height, booth.id().to_string(), TextRole::BoothId);
    }
    if options.show_names {
        if let Some(name) = booth.vendor_name() {
            label(0.0, name.to_string(), TextRole::VendorName);
        }
    }
    label(line_height, feet_label(booth), TextRole::Size);
}

/// "10' × 20'"
pub fn feet_label(booth: &Booth) -> String {
    format!("{}' × {}'", booth.width_feet(), booth.height_feet())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boothplan_core::{BoothUpdate, Calibration, Category, Vendor, VendorChange};

    /// 400x300 plan at 10 px/ft with one assigned, one free booth.
    fn sample() -> (FloorPlanConfig, BoothId, BoothId) {
        let mut config = FloorPlanConfig::new("show");
        config.set_background("hall.png", 400, 300);
        config.apply_calibration(
            Calibration::from_points(Point::ZERO, Point::new(100.0, 0.0), 10.0).unwrap(),
        );
        let a = config.create_booth(Point::new(10.0, 10.0), 10, 10).unwrap().id().to_string();
        let b = config.create_booth(Point::new(150.0, 10.0), 20, 10).unwrap().id().to_string();
        config
            .update_booth(
                &a,
                &BoothUpdate::vendor(VendorChange::Assign(
                    Vendor::new("v1", "Acme Roofing").with_category("Roofing"),
                )),
            )
            .unwrap();
        (config, a, b)
    }

    fn geometry(drawing: &Drawing) -> Vec<(Point, f64)> {
        drawing
            .items
            .iter()
            .filter_map(|item| match item {
                DrawItem::Text {
                    position,
                    font_size,
                    ..
                } => Some((*position, *font_size)),
                _ => None,
            })
            .collect()
    }

    fn rects(drawing: &Drawing) -> Vec<Rect> {
        drawing
            .items
            .iter()
            .filter_map(|item| match item {
                DrawItem::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_render_is_deterministic() {
        let (config, _, _) = sample();
        let options = RenderOptions::editor();
        assert_eq!(render(&config, &options), render(&config, &options));
    }

    #[test]
    fn test_show_names_changes_only_labels() {
        let (config, _, _) = sample();
        let with_names = render(&config, &RenderOptions::editor());
        let without = render(&config, &RenderOptions::editor().with_names(false));

        assert_eq!(with_names.texts(TextRole::VendorName), vec!["Acme Roofing"]);
        assert!(without.texts(TextRole::VendorName).is_empty());
        assert_eq!(rects(&with_names), rects(&without));
        assert_eq!(with_names.texts(TextRole::BoothId), without.texts(TextRole::BoothId));

        // Remaining labels keep their positions and sizes
        let kept: Vec<_> = with_names
            .items
            .iter()
            .filter(|item| !matches!(item, DrawItem::Text { role: TextRole::VendorName, .. }))
            .cloned()
            .collect();
        assert_eq!(geometry(&Drawing { size: with_names.size, items: kept }), geometry(&without));
    }

    #[test]
    fn test_public_hides_names() {
        let (config, _, _) = sample();
        let drawing = render(&config, &RenderOptions::public());
        assert!(drawing.texts(TextRole::VendorName).is_empty());
        assert!(drawing.items.iter().all(|item| match item {
            DrawItem::Text { content, .. } => !content.contains("Acme"),
            _ => true,
        }));
    }

    #[test]
    fn test_fresh_config_renders_placeholder() {
        let config = FloorPlanConfig::new("unseen");
        let drawing = render(&config, &RenderOptions::editor());
        assert_eq!(drawing.size, Size::new(800.0, 600.0));
        assert_eq!(drawing.texts(TextRole::Placeholder), vec![PLACEHOLDER_MESSAGE]);
    }

    #[test]
    fn test_zero_dimension_background_renders_placeholder() {
        let mut config = FloorPlanConfig::new("show");
        config.set_background("hall.png", 0, 300);
        let drawing = render(&config, &RenderOptions::public());
        assert_eq!(drawing.texts(TextRole::Placeholder), vec![PLACEHOLDER_MESSAGE]);
    }

    #[test]
    fn test_interactive_metadata() {
        let (config, a, b) = sample();
        let editor = render(&config, &RenderOptions::editor());
        assert_eq!(editor.hit_test(Point::new(15.0, 15.0)), Some(a.as_str()));
        assert_eq!(editor.hit_test(Point::new(200.0, 50.0)), Some(b.as_str()));

        let public = render(&config, &RenderOptions::public());
        assert_eq!(public.hit_test(Point::new(15.0, 15.0)), None);
    }

    #[test]
    fn test_category_fill() {
        let (config, _, _) = sample();
        let fills = |options: &RenderOptions| -> Vec<Option<boothplan_core::Rgba>> {
            render(&config, options)
                .items
                .iter()
                .filter_map(|item| match item {
                    DrawItem::Rect { fill, meta: Some(_), .. } => Some(*fill),
                    _ => None,
                })
                .collect()
        };

        let colored = fills(&RenderOptions::editor());
        assert_eq!(colored, vec![Some(Category::Roofing.color()), Some(AVAILABLE_COLOR)]);

        let neutral = fills(&RenderOptions::editor().with_category_colors(false));
        assert_eq!(neutral, vec![Some(AVAILABLE_COLOR), Some(AVAILABLE_COLOR)]);
    }

    #[test]
    fn test_grid_only_when_calibrated() {
        let (config, _, _) = sample();
        let lines = |drawing: &Drawing| {
            drawing
                .items
                .iter()
                .filter(|item| matches!(item, DrawItem::Line { .. }))
                .count()
        };
        // 400x300 at 10 px/ft: 39 vertical + 29 horizontal
        assert_eq!(lines(&render(&config, &RenderOptions::editor())), 68);
        assert_eq!(lines(&render(&config, &RenderOptions::public())), 0);

        let mut uncalibrated = FloorPlanConfig::new("show");
        uncalibrated.set_background("hall.png", 400, 300);
        assert_eq!(lines(&render(&uncalibrated, &RenderOptions::editor())), 0);
    }

    #[test]
    fn test_font_size_clamped() {
        let style = RenderStyle::default();
        assert!((style.font_size(20.0, 20.0) - 10.0).abs() < f64::EPSILON);
        assert!((style.font_size(100.0, 100.0) - 18.0).abs() < 1e-9);
        assert!((style.font_size(1000.0, 400.0) - 28.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_labels() {
        let (config, a, _) = sample();
        let drawing = render(&config, &RenderOptions::editor());
        assert_eq!(drawing.texts(TextRole::Size), vec!["10' × 10'", "20' × 10'"]);
        assert_eq!(drawing.texts(TextRole::BoothId)[0], a);

        let bare = render(&config, &RenderOptions::editor().with_labels(false));
        assert!(bare.texts(TextRole::BoothId).is_empty());
    }

    #[test]
    fn test_selection_outline() {
        let (config, a, _) = sample();
        let drawing = render(&config, &RenderOptions::editor().with_selected(Some(a.clone())));
        let style = RenderStyle::default();
        let widths: Vec<f64> = drawing
            .items
            .iter()
            .filter_map(|item| match item {
                DrawItem::Rect { stroke_width, meta: Some(_), .. } => Some(*stroke_width),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![style.selection_width, style.booth_stroke_width]);
    }
}
