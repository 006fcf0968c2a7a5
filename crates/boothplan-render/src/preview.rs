//! Cheap drag feedback: move one booth's items without re-rendering.
//!
//! The controller reports [`DragPreview`]s while a drag is in progress; the
//! authoritative [`render`](crate::render) runs once the drag commits.

use crate::drawing::{DrawItem, Drawing};
use boothplan_core::DragPreview;
use kurbo::Vec2;

/// Shift the dragged booth's rect and labels to the preview position.
///
/// Returns `false` when the drawing has no interactive items for that booth.
pub fn apply_drag_preview(drawing: &mut Drawing, preview: &DragPreview) -> bool {
    let Some(current) = drawing.booth_rect(&preview.booth_id) else {
        return false;
    };
    let delta: Vec2 = preview.rect.origin() - current.origin();
    if delta == Vec2::ZERO {
        return true;
    }
    for item in drawing
        .items
        .iter_mut()
        .filter(|item| item.booth_id() == Some(preview.booth_id.as_str()))
    {
        item.translate(delta);
    }
    true
}
