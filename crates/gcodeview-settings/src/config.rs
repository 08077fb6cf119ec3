//! Viewer configuration for GCodeView
//!
//! Provides configuration file handling and validation for the camera and
//! progress-playback core. Supports JSON and TOML file formats stored in the
//! platform-specific configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Camera settings (distances, projection, trackball and reset tuning)
//! - Input settings (drag buttons, wheel/key zoom steps, key bindings)
//! - Build volume (machine platform dimensions and offsets)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use gcodeview_core::{Key, KeyBinding, Modifier, PointerButton, ViewCommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Projection used by the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl std::fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perspective => write!(f, "perspective"),
            Self::Orthographic => write!(f, "orthographic"),
        }
    }
}

/// Camera tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Camera-to-origin distance restored by reset and fit. When unset the
    /// larger build-platform extent is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_distance: Option<f64>,
    /// Zoom factor applied after a hard reset
    pub reset_zoom: f64,
    /// Virtual trackball radius as a fraction of the camera distance
    pub trackball_scale: f64,
    /// Perspective or orthographic projection
    pub projection: ProjectionMode,
    /// Vertical field of view in degrees (perspective only)
    pub fov_y_degrees: f64,
    /// Near clipping plane
    pub near: f64,
    /// Far clipping plane as a multiple of the camera distance
    pub far_factor: f64,
    /// Window depth (0 = near, 1 = far) used to unproject zoom pivots
    pub pivot_depth: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            default_distance: None,
            reset_zoom: 0.9,
            trackball_scale: 1.0 / 250.0,
            projection: ProjectionMode::default(),
            fov_y_degrees: 60.0,
            near: 0.1,
            far_factor: 3.0,
            pivot_depth: 1.0,
        }
    }
}

impl CameraSettings {
    /// Whether the orthographic projection is active
    pub fn is_orthographic(&self) -> bool {
        self.projection == ProjectionMode::Orthographic
    }
}

/// Mouse, wheel and keyboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Button whose drag rotates the trackball
    pub rotate_button: PointerButton,
    /// Button whose drag pans the view
    pub pan_button: PointerButton,
    /// Pan by unprojected plane motion instead of raw pixel deltas
    pub plane_projected_pan: bool,
    /// Zoom factor per wheel notch
    pub wheel_zoom_factor: f64,
    /// Zoom factor per zoom key press
    pub zoom_step: f64,
    /// Zoom factor per zoom key press while the precision modifier is held
    pub precision_zoom_step: f64,
    /// Modifier that turns the wheel into a layer stepper
    pub layer_wheel_modifier: Modifier,
    /// Modifier that selects the precision zoom step
    pub precision_modifier: Modifier,
    /// Key to command table
    pub key_bindings: Vec<KeyBinding>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            rotate_button: PointerButton::Primary,
            pan_button: PointerButton::Secondary,
            plane_projected_pan: false,
            wheel_zoom_factor: 1.05,
            zoom_step: 1.1,
            precision_zoom_step: 1.05,
            layer_wheel_modifier: Modifier::Shift,
            precision_modifier: Modifier::Control,
            key_bindings: default_key_bindings(),
        }
    }
}

impl InputSettings {
    /// Look up the command bound to a key
    pub fn command_for(&self, key: Key) -> Option<ViewCommand> {
        self.key_bindings
            .iter()
            .find(|binding| binding.matches(key))
            .map(|binding| binding.command)
    }
}

fn default_key_bindings() -> Vec<KeyBinding> {
    use ViewCommand::*;

    vec![
        KeyBinding::new(Key::Char('U'), LayerUp),
        KeyBinding::new(Key::Up, LayerUp),
        KeyBinding::new(Key::Char('D'), LayerDown),
        KeyBinding::new(Key::Down, LayerDown),
        KeyBinding::new(Key::PageDown, ZoomIn),
        KeyBinding::new(Key::NumpadAdd, ZoomIn),
        KeyBinding::new(Key::Right, ZoomIn),
        KeyBinding::new(Key::Char('='), ZoomIn),
        KeyBinding::new(Key::PageUp, ZoomOut),
        KeyBinding::new(Key::NumpadSubtract, ZoomOut),
        KeyBinding::new(Key::Left, ZoomOut),
        KeyBinding::new(Key::Char('-'), ZoomOut),
        KeyBinding::new(Key::Char('F'), Fit),
        KeyBinding::new(Key::Char('R'), Reset),
    ]
}

/// Machine build volume
///
/// Width/depth/height are the printable extents in mm; the offsets locate the
/// platform's lower-left corner in machine coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildVolume {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub z_offset: f64,
}

impl Default for BuildVolume {
    fn default() -> Self {
        Self {
            width: 200.0,
            depth: 200.0,
            height: 100.0,
            x_offset: 0.0,
            y_offset: 0.0,
            z_offset: 0.0,
        }
    }
}

impl BuildVolume {
    /// Platform centre in machine coordinates (X, Y)
    pub fn platform_center(&self) -> (f64, f64) {
        (
            self.x_offset + self.width / 2.0,
            self.y_offset + self.depth / 2.0,
        )
    }

    /// Larger of the two platform extents
    pub fn max_platform_extent(&self) -> f64 {
        self.width.max(self.depth)
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerSettings {
    pub camera: CameraSettings,
    pub input: InputSettings,
    pub build_volume: BuildVolume,
}

impl ViewerSettings {
    /// Create new settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera distance for reset and fit: the configured value, or the larger
    /// platform extent of the build volume
    pub fn camera_distance(&self) -> f64 {
        self.camera
            .default_distance
            .unwrap_or_else(|| self.build_volume.max_platform_extent())
    }

    /// Default settings file location (`<config_dir>/gcodeview/viewer.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
        })?;
        Ok(dir.join("gcodeview").join("viewer.toml"))
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let settings: Self = match Format::from_path(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        settings.validate()?;
        debug!("Loaded viewer settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from file, or fall back to defaults if it does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!(
                "No viewer settings at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        debug!("Saved viewer settings to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let camera = &self.camera;
        if let Some(distance) = camera.default_distance {
            if !(distance > 0.0) {
                return Err(SettingsError::invalid(
                    "camera.default_distance",
                    "must be > 0",
                ));
            }
        }
        if !(camera.reset_zoom > 0.0) {
            return Err(SettingsError::invalid("camera.reset_zoom", "must be > 0"));
        }
        if !(camera.trackball_scale > 0.0) {
            return Err(SettingsError::invalid(
                "camera.trackball_scale",
                "must be > 0",
            ));
        }
        if !(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0) {
            return Err(SettingsError::invalid(
                "camera.fov_y_degrees",
                "must be between 0 and 180",
            ));
        }
        if !(camera.near > 0.0) {
            return Err(SettingsError::invalid("camera.near", "must be > 0"));
        }
        if !(camera.near < self.camera_distance() * camera.far_factor) {
            return Err(SettingsError::invalid(
                "camera.far_factor",
                "far plane must lie beyond the near plane",
            ));
        }
        if !(0.0..=1.0).contains(&camera.pivot_depth) {
            return Err(SettingsError::invalid(
                "camera.pivot_depth",
                "must be within [0, 1]",
            ));
        }

        let input = &self.input;
        if input.rotate_button == input.pan_button {
            return Err(SettingsError::invalid(
                "input.pan_button",
                format!("conflicts with rotate button ({})", input.rotate_button),
            ));
        }
        if !(input.wheel_zoom_factor > 1.0) {
            return Err(SettingsError::invalid(
                "input.wheel_zoom_factor",
                "must be > 1",
            ));
        }
        if !(input.zoom_step > 1.0) {
            return Err(SettingsError::invalid("input.zoom_step", "must be > 1"));
        }
        if !(input.precision_zoom_step > 1.0) {
            return Err(SettingsError::invalid(
                "input.precision_zoom_step",
                "must be > 1",
            ));
        }

        let volume = &self.build_volume;
        if !(volume.width > 0.0 && volume.depth > 0.0 && volume.height > 0.0) {
            return Err(SettingsError::invalid(
                "build_volume",
                "dimensions must be > 0",
            ));
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }
}
