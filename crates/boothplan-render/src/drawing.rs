//! Vector drawing description produced by the renderer.
//!
//! A [`Drawing`] is backend-neutral: the web editor, the SVG writer and GPU
//! backends all consume the same item list, painting items in order.

use boothplan_core::BoothId;
use boothplan_core::category::Rgba;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Identifies the booth an item belongs to, for click routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoothMeta {
    pub booth_id: BoothId,
}

/// What a text item says, independent of its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextRole {
    BoothId,
    VendorName,
    Size,
    Placeholder,
}

/// One painted item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DrawItem {
    /// Background image, stretched to `rect`.
    Image { reference: String, rect: Rect },
    #[serde(rename_all = "camelCase")]
    Rect {
        rect: Rect,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<BoothMeta>,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    },
    /// Text centered on `position`.
    #[serde(rename_all = "camelCase")]
    Text {
        position: Point,
        content: String,
        font_size: f64,
        color: Rgba,
        role: TextRole,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<BoothMeta>,
    },
}

impl DrawItem {
    /// Booth this item belongs to, if it carries metadata.
    pub fn booth_id(&self) -> Option<&str> {
        match self {
            DrawItem::Rect { meta, .. } | DrawItem::Text { meta, .. } => {
                meta.as_ref().map(|m| m.booth_id.as_str())
            }
            _ => None,
        }
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        match self {
            DrawItem::Image { rect, .. } | DrawItem::Rect { rect, .. } => *rect = *rect + delta,
            DrawItem::Line { from, to, .. } => {
                *from += delta;
                *to += delta;
            }
            DrawItem::Text { position, .. } => *position += delta,
        }
    }
}

/// A complete rendered floor plan in layout pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub size: Size,
    pub items: Vec<DrawItem>,
}

impl Drawing {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    /// Topmost booth whose rect contains `point` (layout space).
    ///
    /// Only interactive drawings carry booth metadata; others never hit.
    pub fn hit_test(&self, point: Point) -> Option<&str> {
        self.items.iter().rev().find_map(|item| match item {
            DrawItem::Rect {
                rect,
                meta: Some(meta),
                ..
            } if rect.contains(point) => Some(meta.booth_id.as_str()),
            _ => None,
        })
    }

    /// Bounds of a booth's rect, if it is in the drawing.
    pub fn booth_rect(&self, booth_id: &str) -> Option<Rect> {
        self.items.iter().find_map(|item| match item {
            DrawItem::Rect {
                rect,
                meta: Some(meta),
                ..
            } if meta.booth_id == booth_id => Some(*rect),
            _ => None,
        })
    }

    /// Text content of every item with the given role, in paint order.
    pub fn texts(&self, role: TextRole) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                DrawItem::Text {
                    content, role: r, ..
                } if *r == role => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}
