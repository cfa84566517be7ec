//! Input events delivered by the window host.
//!
//! Hosts translate their native keyboard and mouse notifications into
//! [`InputEvent`]s and hand them to the engine, which forwards each one
//! synchronously to the active scene.

use crate::geometry::Vector;

/// Mouse buttons, numbered the way hosts report them (left = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    X1,
    X2,
}

impl MouseButton {
    /// Map a host button index to a button. Unknown indices yield `None`.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            1 => Some(MouseButton::Left),
            2 => Some(MouseButton::Middle),
            3 => Some(MouseButton::Right),
            4 => Some(MouseButton::X1),
            5 => Some(MouseButton::X2),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::X1 => 4,
            MouseButton::X2 => 5,
        }
    }
}

/// A physical key press or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Host scancode.
    pub scancode: i32,
    /// Character produced by the key, if any.
    pub character: Option<char>,
    /// Key name such as `"ArrowUp"` or `"KeyA"`.
    pub name: String,
}

impl KeyEvent {
    pub fn new(scancode: i32, character: Option<char>, name: impl Into<String>) -> Self {
        Self {
            scancode,
            character,
            name: name.into(),
        }
    }

    /// Key event identified only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(0, None, name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    /// Text input, after keyboard layout and modifiers are applied.
    KeyChar(char),
    MouseDown { button: MouseButton, pos: Vector },
    MouseUp { button: MouseButton, pos: Vector },
    MouseMove { pos: Vector },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_button_indices_round_trip() {
        for index in 1..=5 {
            let button = MouseButton::from_index(index).unwrap();
            assert_eq!(button.index(), index);
        }
        assert_eq!(MouseButton::from_index(0), None);
        assert_eq!(MouseButton::from_index(6), None);
    }

    #[test]
    fn test_named_key_event() {
        let ev = KeyEvent::named("ArrowUp");
        assert_eq!(ev.name, "ArrowUp");
        assert_eq!(ev.scancode, 0);
        assert_eq!(ev.character, None);
    }
}
