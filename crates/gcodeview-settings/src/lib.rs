//! GCodeView Settings Crate
//!
//! Handles viewer configuration: camera tuning, input bindings and the
//! machine build volume, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    BuildVolume, CameraSettings, InputSettings, ProjectionMode, ViewerSettings,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
