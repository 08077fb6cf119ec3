//! Toolkit-agnostic input vocabulary
//!
//! The host windowing toolkit translates its own key codes, buttons and
//! modifier masks into these types once, at the boundary. Everything past
//! that point (bindings, dispatch, tests) never sees toolkit event objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pointer buttons that can start a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    /// Left button on a right-handed mouse
    Primary,
    /// Right button on a right-handed mouse
    Secondary,
    /// Wheel button
    Middle,
}

impl fmt::Display for PointerButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
            Self::Middle => write!(f, "middle"),
        }
    }
}

/// A single modifier key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Shift,
    Control,
    Alt,
}

/// Modifier keys held while an event was generated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Only shift held
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
    };

    /// Only control held
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };

    /// Whether the given modifier is held
    pub fn contains(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shift => self.shift,
            Modifier::Control => self.control,
            Modifier::Alt => self.alt,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.control || self.alt)
    }
}

/// Keys the viewer can bind commands to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// A printable character; letters compare case-insensitively
    Char(char),
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    NumpadAdd,
    NumpadSubtract,
    /// Raw toolkit key code with no symbolic mapping
    Code(u32),
}

impl Key {
    /// Build a character key, folding letters to upper case
    pub fn character(c: char) -> Self {
        Self::Char(c.to_ascii_uppercase())
    }

    /// Canonical form used when comparing against bindings
    pub fn normalized(self) -> Self {
        match self {
            Self::Char(c) => Self::Char(c.to_ascii_uppercase()),
            other => other,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", c),
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
            Self::PageUp => write!(f, "PageUp"),
            Self::PageDown => write!(f, "PageDown"),
            Self::NumpadAdd => write!(f, "Numpad+"),
            Self::NumpadSubtract => write!(f, "Numpad-"),
            Self::Code(code) => write!(f, "#{}", code),
        }
    }
}

/// Discrete view commands reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewCommand {
    /// Show one more layer
    LayerUp,
    /// Show one fewer layer
    LayerDown,
    ZoomIn,
    ZoomOut,
    /// Frame the loaded model's bounding box
    Fit,
    /// Restore distance, pan and orientation
    Reset,
}

impl fmt::Display for ViewCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayerUp => write!(f, "Layer Up"),
            Self::LayerDown => write!(f, "Layer Down"),
            Self::ZoomIn => write!(f, "Zoom In"),
            Self::ZoomOut => write!(f, "Zoom Out"),
            Self::Fit => write!(f, "Fit to Model"),
            Self::Reset => write!(f, "Reset View"),
        }
    }
}

/// Association between a key and the command it triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: Key,
    pub command: ViewCommand,
}

impl KeyBinding {
    pub fn new(key: Key, command: ViewCommand) -> Self {
        Self { key, command }
    }

    /// Whether this binding fires for the given key
    pub fn matches(&self, key: Key) -> bool {
        self.key.normalized() == key.normalized()
    }
}
