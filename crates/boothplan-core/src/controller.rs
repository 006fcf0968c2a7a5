//! Interaction state machine for the floor plan editor.
//!
//! The controller is subscribed once to the drawing surface. Every pointer
//! and key event goes through it; it hit-tests against the layout model and
//! answers with [`Effect`]s for the host to carry out, so nothing has to be
//! re-bound when the drawing is rebuilt.
//!
//! ```text
//!            toggle                      pointer-down on booth
//!   Calibrate <─────> Select ───────────────────────────────> Dragging
//!      │  2 picks + distance  ▲                                   │
//!      └──────── / Escape ────┘<──── pointer-up / capture lost ───┘
//! ```

use crate::booth::{BoothId, BoothUpdate};
use crate::calibration::{CalibrationEngine, CalibrationError, CalibrationStep};
use crate::config::{BoothPreset, EditorConfig};
use crate::input::{Key, KeyEvent, PointerEvent, PointerId, PointerKind};
use crate::session::{EditorSession, SessionError};
use crate::snap::{grid_size, snap_point};
use crate::transform::CoordinateTransform;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Select,
    Calibrate,
    Dragging,
}

/// Where a booth is being dragged to, before the move is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    pub booth_id: BoothId,
    /// Snapped, clamped bounds in layout pixels.
    pub rect: Rect,
}

/// Instructions for the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Rebuild the drawing from the model.
    Render,
    /// Cheap update: move only the dragged booth's visuals.
    DragPreview(DragPreview),
    CapturePointer(PointerId),
    ReleasePointer(PointerId),
    ShowPanel(BoothId),
    HidePanel,
    /// Ask the operator for the real distance between the two picks.
    RequestDistance { pixel_distance: f64 },
    CalibrationRejected(CalibrationError),
    /// Ask the operator to confirm deleting a booth.
    ConfirmDelete(BoothId),
    ModeChanged(Mode),
}

#[derive(Debug, Clone)]
struct DragState {
    booth_id: BoothId,
    pointer_id: PointerId,
    /// Pointer position minus booth origin at pointer-down.
    grab_offset: Vec2,
    start: Point,
    current: Point,
    size: (f64, f64),
}

impl DragState {
    fn preview(&self) -> DragPreview {
        DragPreview {
            booth_id: self.booth_id.clone(),
            rect: Rect::new(
                self.current.x,
                self.current.y,
                self.current.x + self.size.0,
                self.current.y + self.size.1,
            ),
        }
    }
}

/// Routes operator input to the editing session.
#[derive(Debug, Clone)]
pub struct InteractionController {
    session: EditorSession,
    settings: EditorConfig,
    transform: CoordinateTransform,
    calibration: CalibrationEngine,
    drag: Option<DragState>,
    pending_delete: Option<BoothId>,
}

impl InteractionController {
    pub fn new(session: EditorSession, settings: EditorConfig) -> Self {
        Self {
            session,
            settings,
            transform: CoordinateTransform::default(),
            calibration: CalibrationEngine::new(),
            drag: None,
            pending_delete: None,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Direct session access for saving and vendor refreshes.
    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    /// End the session (navigation away).
    pub fn into_session(self) -> EditorSession {
        self.session
    }

    pub fn settings(&self) -> &EditorConfig {
        &self.settings
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Update scroll/zoom as the surface is scrolled, zoomed, or resized.
    pub fn transform_mut(&mut self) -> &mut CoordinateTransform {
        &mut self.transform
    }

    pub fn mode(&self) -> Mode {
        if self.drag.is_some() {
            Mode::Dragging
        } else if self.calibration.is_active() {
            Mode::Calibrate
        } else {
            Mode::Select
        }
    }

    pub fn calibration(&self) -> &CalibrationEngine {
        &self.calibration
    }

    /// Current drag target, if dragging.
    pub fn drag_preview(&self) -> Option<DragPreview> {
        self.drag.as_ref().map(DragState::preview)
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Snap to the plan's grid, then clamp to the positive quadrant.
    ///
    /// Shared by drag and drop so both land on the same grid.
    fn place(&self, target: Point) -> Point {
        let snapped = snap_point(target, grid_size(self.session.config())).point;
        Point::new(snapped.x.max(0.0), snapped.y.max(0.0))
    }

    /// Enter or leave calibrate mode.
    pub fn toggle_calibration(&mut self) -> Vec<Effect> {
        match self.mode() {
            Mode::Select => {
                self.calibration.begin();
                self.pending_delete = None;
                log::debug!("Calibration started");
                vec![Effect::ModeChanged(Mode::Calibrate), Effect::Render]
            }
            Mode::Calibrate => self.cancel_calibration(),
            Mode::Dragging => Vec::new(),
        }
    }

    pub fn cancel_calibration(&mut self) -> Vec<Effect> {
        if !self.calibration.is_active() {
            return Vec::new();
        }
        self.calibration.cancel();
        log::debug!("Calibration cancelled");
        vec![Effect::ModeChanged(Mode::Select), Effect::Render]
    }

    /// Finish calibration with the operator's distance entry.
    ///
    /// An invalid entry restarts the picks and leaves the existing scale alone.
    pub fn submit_calibration_distance(&mut self, input: &str) -> Vec<Effect> {
        if self.mode() != Mode::Calibrate {
            return Vec::new();
        }
        match self.calibration.submit_distance(input) {
            Ok(calibration) => {
                self.session.apply_calibration(calibration);
                vec![Effect::ModeChanged(Mode::Select), Effect::Render]
            }
            Err(e) => {
                log::warn!("Calibration rejected: {}", e);
                vec![Effect::CalibrationRejected(e), Effect::Render]
            }
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<Effect> {
        if self.drag.is_some() {
            return self.handle_captured(event);
        }
        if event.kind != PointerKind::Down {
            return Vec::new();
        }
        let layout = self.transform.to_layout_space(event.position);
        match self.mode() {
            Mode::Calibrate => self.calibration_click(layout),
            Mode::Select => self.select_press(event.pointer_id, layout),
            Mode::Dragging => Vec::new(),
        }
    }

    fn calibration_click(&mut self, layout: Point) -> Vec<Effect> {
        match self.calibration.register_click(layout) {
            CalibrationStep::AwaitingDistance { point1, point2 } => vec![
                Effect::Render,
                Effect::RequestDistance {
                    pixel_distance: point1.distance(point2),
                },
            ],
            _ => vec![Effect::Render],
        }
    }

    fn select_press(&mut self, pointer_id: PointerId, layout: Point) -> Vec<Effect> {
        let tolerance = self.settings.hit_tolerance / self.transform.zoom;
        let hit = self
            .session
            .config()
            .booths_at_point(layout, tolerance)
            .into_iter()
            .next();

        let Some(booth_id) = hit else {
            self.pending_delete = None;
            if self.session.clear_selection() {
                return vec![Effect::HidePanel, Effect::Render];
            }
            return Vec::new();
        };

        let Some(booth) = self.session.config().booth(&booth_id) else {
            return Vec::new();
        };
        let origin = booth.origin();
        self.drag = Some(DragState {
            booth_id: booth_id.clone(),
            pointer_id,
            grab_offset: layout - origin,
            start: origin,
            current: origin,
            size: (booth.width_px(), booth.height_px()),
        });
        self.session.select(&booth_id);
        self.pending_delete = None;

        vec![
            Effect::CapturePointer(pointer_id),
            Effect::ModeChanged(Mode::Dragging),
            Effect::ShowPanel(booth_id),
            Effect::Render,
        ]
    }

    /// Events while a drag holds the pointer capture.
    ///
    /// Routing ignores whatever is under the pointer; only the capturing
    /// pointer is listened to.
    fn handle_captured(&mut self, event: PointerEvent) -> Vec<Effect> {
        let Some(drag) = self.drag.as_ref() else {
            return Vec::new();
        };
        if event.pointer_id != drag.pointer_id {
            return Vec::new();
        }
        match event.kind {
            PointerKind::Down => Vec::new(),
            PointerKind::Move => {
                let layout = self.transform.to_layout_space(event.position);
                let target = self.place(layout - drag.grab_offset);
                match self.drag.as_mut() {
                    Some(drag) if drag.current != target => {
                        drag.current = target;
                        vec![Effect::DragPreview(drag.preview())]
                    }
                    _ => Vec::new(),
                }
            }
            PointerKind::Up | PointerKind::CaptureLost => {
                let layout = self.transform.to_layout_space(event.position);
                let target = self.place(layout - drag.grab_offset);
                self.commit_drag(target)
            }
        }
    }

    fn commit_drag(&mut self, target: Point) -> Vec<Effect> {
        let Some(drag) = self.drag.take() else {
            return Vec::new();
        };
        if target != drag.start {
            match self.session.move_booth(&drag.booth_id, target) {
                Ok(position) => log::debug!(
                    "Moved {} to ({:.1}, {:.1})",
                    drag.booth_id,
                    position.x,
                    position.y
                ),
                Err(e) => log::warn!("Drag commit failed: {}", e),
            }
        }
        vec![
            Effect::ReleasePointer(drag.pointer_id),
            Effect::ModeChanged(Mode::Select),
            Effect::Render,
        ]
    }

    /// Abandon a drag, leaving the booth where it started.
    fn cancel_drag(&mut self) -> Vec<Effect> {
        let Some(drag) = self.drag.take() else {
            return Vec::new();
        };
        vec![
            Effect::ReleasePointer(drag.pointer_id),
            Effect::ModeChanged(Mode::Select),
            Effect::Render,
        ]
    }

    /// Drop a preset from the booth bank at a screen position.
    ///
    /// Only honoured in select mode. The new booth is selected.
    pub fn drop_preset(&mut self, position: Point, preset: &BoothPreset) -> Vec<Effect> {
        if self.mode() != Mode::Select {
            log::debug!("Ignoring bank drop in {:?} mode", self.mode());
            return Vec::new();
        }
        let (width_feet, height_feet) = if preset.custom {
            (self.settings.default_booth_feet, self.settings.default_booth_feet)
        } else {
            (preset.width_feet, preset.height_feet)
        };
        let origin = self.place(self.transform.to_layout_space(position));
        match self.session.create_booth(origin, width_feet, height_feet) {
            Ok(id) => {
                self.session.select(&id);
                self.pending_delete = None;
                vec![Effect::ShowPanel(id), Effect::Render]
            }
            Err(e) => {
                log::warn!("Bank drop rejected: {}", e);
                Vec::new()
            }
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> Vec<Effect> {
        match event.key {
            Key::Escape => self.escape(),
            _ if event.text_input_focused => Vec::new(),
            Key::Delete | Key::Backspace => match self.session.selection() {
                Some(id) if self.mode() == Mode::Select => {
                    let id = id.to_string();
                    self.request_delete(&id)
                }
                _ => Vec::new(),
            },
            key => match key.arrow_direction() {
                Some(direction) => self.nudge(direction),
                None => Vec::new(),
            },
        }
    }

    fn escape(&mut self) -> Vec<Effect> {
        if self.drag.is_some() {
            return self.cancel_drag();
        }
        if self.calibration.is_active() {
            return self.cancel_calibration();
        }
        self.pending_delete = None;
        if self.session.clear_selection() {
            return vec![Effect::HidePanel, Effect::Render];
        }
        Vec::new()
    }

    /// Move the selection one grid unit (one foot) in a direction.
    fn nudge(&mut self, (dx, dy): (f64, f64)) -> Vec<Effect> {
        if self.mode() != Mode::Select {
            return Vec::new();
        }
        let Some(booth) = self.session.selected_booth() else {
            return Vec::new();
        };
        let step = grid_size(self.session.config()).unwrap_or(self.settings.nudge_px);
        let id = booth.id().to_string();
        let target = booth.origin() + Vec2::new(dx * step, dy * step);
        match self.session.move_booth(&id, target) {
            Ok(_) => vec![Effect::Render],
            Err(_) => Vec::new(),
        }
    }

    /// Ask for confirmation before deleting a booth.
    pub fn request_delete(&mut self, id: &str) -> Vec<Effect> {
        if self.session.config().booth(id).is_none() {
            return Vec::new();
        }
        self.pending_delete = Some(id.to_string());
        vec![Effect::ConfirmDelete(id.to_string())]
    }

    /// Answer the pending delete confirmation.
    pub fn confirm_delete(&mut self, confirmed: bool) -> Vec<Effect> {
        let Some(id) = self.pending_delete.take() else {
            return Vec::new();
        };
        if !confirmed {
            return Vec::new();
        }
        let was_selected = self.session.selection() == Some(id.as_str());
        if self.session.delete_booth(&id).is_none() {
            return Vec::new();
        }
        if was_selected {
            vec![Effect::HidePanel, Effect::Render]
        } else {
            vec![Effect::Render]
        }
    }

    /// Select a booth from outside the canvas (booth list, search).
    pub fn select_booth(&mut self, id: &str) -> Vec<Effect> {
        if self.mode() != Mode::Select || !self.session.select(id) {
            return Vec::new();
        }
        vec![Effect::ShowPanel(id.to_string()), Effect::Render]
    }

    /// Apply a property-panel edit to a booth.
    pub fn edit_booth(&mut self, id: &str, update: &BoothUpdate) -> Result<Vec<Effect>, SessionError> {
        self.session.update_booth(id, update)?;
        Ok(vec![Effect::Render])
    }

    /// Assign or clear (`None` / empty) a booth's vendor.
    pub fn assign_vendor(&mut self, id: &str, vendor_id: Option<&str>) -> Result<Vec<Effect>, SessionError> {
        self.session.assign_vendor(id, vendor_id)?;
        Ok(vec![Effect::Render])
    }
}
