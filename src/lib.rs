//! # GCodeView
//!
//! Interactive camera and print-progress playback core for 3D G-code toolpath
//! viewers:
//! - Virtual trackball rotation with quaternion orientation
//! - Pan and zoom-towards-cursor view transform with soft/hard reset and fit
//! - Screen to model-space unprojection for zoom pivots and picking
//! - Layer cursor and thread-safe progress cutoff driving what gets drawn
//!
//! ## Architecture
//!
//! GCodeView is organized as a workspace with multiple crates:
//!
//! 1. **gcodeview-core** - Errors, input vocabulary, shared type aliases
//! 2. **gcodeview-settings** - Camera, input and build-volume configuration
//! 3. **gcodeview-visualizer** - Trackball, view transform, cursors, dispatcher
//! 4. **gcodeview** - Re-exports, logging setup and the playback demo binary

pub mod types;

pub use gcodeview_visualizer::visualizer;

pub use gcodeview_core::{
    EventCallback, Key, KeyBinding, Modifier, Modifiers, PointerButton, Result, ViewCommand,
    ViewError,
};

pub use gcodeview_settings::{
    BuildVolume, CameraSettings, InputSettings, ProjectionMode, SettingsError, ViewerSettings,
};

pub use gcodeview_visualizer::{
    DrawPlan, InputDispatcher, InputEvent, LayerProgress, ProgressHandle, Response,
    ToolpathModel, ToolpathModelBuilder, Viewer, Viewport,
};

pub use types::PlaybackJob;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Cargo profile the binary was built with
pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
