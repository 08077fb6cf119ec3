//! # GCodeView Core
//!
//! Core types, errors, and the toolkit-agnostic input vocabulary shared by
//! the settings and visualizer crates.

pub mod error;
pub mod input;
pub mod types;

pub use error::{Result, ViewError};

pub use input::{Key, KeyBinding, Modifier, Modifiers, PointerButton, ViewCommand};

pub use types::{thread_safe_rw, EventCallback, ThreadSafeRw};
