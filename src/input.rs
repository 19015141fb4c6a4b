//! Key-state input collaborator
//!
//! The sim queries held controls once per player per tick; it never sees
//! key events. Embedders feed press/release transitions into a [`KeyState`]
//! (or implement [`InputSource`] over their own input system).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Identifier of a turn control. The default roster uses DOM-style key
/// codes, but the sim treats the value as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlId(pub u16);

/// The two turn inputs a player can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// Parse a direction name from config text ("left"/"right", any case)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "left" => Some(TurnDirection::Left),
            "right" => Some(TurnDirection::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnDirection::Left => "left",
            TurnDirection::Right => "right",
        }
    }
}

/// Source of held-control state, queried once per player control per
/// simulation tick
pub trait InputSource {
    fn is_held(&self, control: ControlId) -> bool;
}

/// Pressed-set keyboard model: a control is held between its press and
/// release transitions
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pressed: HashSet<ControlId>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: ControlId) {
        self.pressed.insert(control);
    }

    pub fn release(&mut self, control: ControlId) {
        self.pressed.remove(&control);
    }

    /// Release everything (e.g. on focus loss)
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

impl InputSource for KeyState {
    fn is_held(&self, control: ControlId) -> bool {
        self.pressed.contains(&control)
    }
}

/// Key codes used by the default roster
pub mod keys {
    use super::ControlId;

    pub const DIGIT_1: ControlId = ControlId(49);
    pub const Q: ControlId = ControlId(81);
    pub const CTRL: ControlId = ControlId(17);
    pub const ALT: ControlId = ControlId(18);
    pub const M: ControlId = ControlId(77);
    pub const COMMA: ControlId = ControlId(188);
    pub const LEFT_ARROW: ControlId = ControlId(37);
    pub const DOWN_ARROW: ControlId = ControlId(40);
    pub const NUMPAD_DIVIDE: ControlId = ControlId(111);
    pub const NUMPAD_MULTIPLY: ControlId = ControlId(106);
}
