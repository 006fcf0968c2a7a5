//! Pointer and keyboard events delivered to the interaction controller.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Identifies one pointer (mouse, pen, touch contact).
pub type PointerId = u32;

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// The surface lost capture (window blur, pointer cancelled).
    CaptureLost,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn down(pointer_id: PointerId, position: Point) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Down,
            position,
        }
    }

    pub fn moved(pointer_id: PointerId, position: Point) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Move,
            position,
        }
    }

    pub fn up(pointer_id: PointerId, position: Point) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Up,
            position,
        }
    }

    pub fn capture_lost(pointer_id: PointerId, position: Point) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::CaptureLost,
            position,
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM-style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "Delete" | "Del" => Key::Delete,
            "Backspace" => Key::Backspace,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }

    /// Unit direction for arrow keys.
    pub fn arrow_direction(self) -> Option<(f64, f64)> {
        match self {
            Key::ArrowUp => Some((0.0, -1.0)),
            Key::ArrowDown => Some((0.0, 1.0)),
            Key::ArrowLeft => Some((-1.0, 0.0)),
            Key::ArrowRight => Some((1.0, 0.0)),
            _ => None,
        }
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    /// A text field (property panel, distance prompt) has focus.
    pub text_input_focused: bool,
}

impl KeyEvent {
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            text_input_focused: false,
        }
    }

    pub fn in_text_input(key: Key) -> Self {
        Self {
            key,
            text_input_focused: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Backspace"), Key::Backspace);
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("a"), Key::Other);
    }

    #[test]
    fn test_arrow_direction() {
        assert_eq!(Key::ArrowUp.arrow_direction(), Some((0.0, -1.0)));
        assert_eq!(Key::Delete.arrow_direction(), None);
    }
}
