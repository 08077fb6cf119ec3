//! Settings load/save tests against real files

use gcodeview_core::{Key, KeyBinding, Modifier, PointerButton, ViewCommand};
use gcodeview_settings::{ProjectionMode, SettingsError, ViewerSettings};
use tempfile::TempDir;

fn customized() -> ViewerSettings {
    let mut settings = ViewerSettings::default();
    settings.camera.projection = ProjectionMode::Orthographic;
    settings.camera.default_distance = Some(320.0);
    settings.input.plane_projected_pan = true;
    settings.input.pan_button = PointerButton::Middle;
    settings.input.layer_wheel_modifier = Modifier::Alt;
    settings
        .input
        .key_bindings
        .push(KeyBinding::new(Key::Code(388), ViewCommand::ZoomIn));
    settings.build_volume.width = 300.0;
    settings
}

#[test]
fn test_toml_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("viewer.toml");

    let settings = customized();
    settings.save_to_file(&path).unwrap();

    let loaded = ViewerSettings::load_from_file(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.input.command_for(Key::Code(388)), Some(ViewCommand::ZoomIn));
}

#[test]
fn test_json_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("viewer.json");

    let settings = customized();
    settings.save_to_file(&path).unwrap();

    let loaded = ViewerSettings::load_from_file(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("gcodeview").join("viewer.toml");

    ViewerSettings::default().save_to_file(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_partial_toml_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("viewer.toml");
    std::fs::write(
        &path,
        "[camera]\nprojection = \"orthographic\"\n\n[input]\nplane_projected_pan = true\n",
    )
    .unwrap();

    let loaded = ViewerSettings::load_from_file(&path).unwrap();
    assert!(loaded.camera.is_orthographic());
    assert!(loaded.input.plane_projected_pan);
    assert_eq!(loaded.camera.default_distance, None);
    assert_eq!(loaded.camera_distance(), 200.0);
    assert_eq!(loaded.input.command_for(Key::Char('f')), Some(ViewCommand::Fit));
    assert_eq!(loaded.build_volume.width, 200.0);
}

#[test]
fn test_build_volume_sets_camera_distance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("viewer.toml");
    std::fs::write(&path, "[build_volume]\nwidth = 250.0\ndepth = 310.0\n").unwrap();

    let loaded = ViewerSettings::load_from_file(&path).unwrap();
    assert_eq!(loaded.camera_distance(), 310.0);

    std::fs::write(
        &path,
        "[camera]\ndefault_distance = 180.0\n\n[build_volume]\nwidth = 250.0\ndepth = 310.0\n",
    )
    .unwrap();
    let loaded = ViewerSettings::load_from_file(&path).unwrap();
    assert_eq!(loaded.camera_distance(), 180.0);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("viewer.toml");
    std::fs::write(&path, "[input]\nzoom_step = 0.5\n").unwrap();

    let err = ViewerSettings::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidSetting { .. }));
}

#[test]
fn test_malformed_json_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("viewer.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = ViewerSettings::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::JsonError(_)));
}

#[test]
fn test_load_or_default_without_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");

    let loaded = ViewerSettings::load_or_default(&path).unwrap();
    assert_eq!(loaded, ViewerSettings::default());
}

#[test]
fn test_missing_file_is_load_error() {
    let dir = TempDir::new().unwrap();
    let err = ViewerSettings::load_from_file(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}
