//! Type system utilities and aliases.
//!
//! - [`aliases`]: shared-state and callback aliases used across crates.

pub mod aliases;

pub use aliases::*;
