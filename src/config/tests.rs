//! Unit tests for configuration module
//!
//! Tests configuration parsing, validation, serialization/deserialization,
//! and edge cases in configuration handling.

use super::*;
use anyhow::Result;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_default_configuration_is_valid() {
    let config = PerchConfig::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.grab.min_width, 1);
    assert_eq!(config.grab.min_height, 1);
    assert!(config.grab.raise_on_begin);
    assert_eq!(config.bindings.drag_move_button, "left");
    assert_eq!(config.bindings.drag_resize_button, "right");
}

#[test]
fn test_configuration_serialization_roundtrip() -> Result<()> {
    let original_config = PerchConfig::default();

    let toml_string = toml::to_string(&original_config)?;
    let deserialized_config: PerchConfig = toml::from_str(&toml_string)?;

    assert_eq!(original_config, deserialized_config);

    Ok(())
}

#[test]
fn test_configuration_from_file() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("perch.toml");

    let test_config = r#"
[grab]
min_width = 64
min_height = 32
raise_on_begin = false

[bindings]
drag_move_modifier = "Alt"
drag_move_button = "left"
drag_resize_modifier = "Alt"
drag_resize_button = "middle"

[general]
startup_command = "foot --server"
"#;

    fs::write(&file_path, test_config)?;

    let config = PerchConfig::load(&file_path)?;
    assert_eq!(config.grab.min_width, 64);
    assert_eq!(config.grab.min_height, 32);
    assert!(!config.grab.raise_on_begin);
    assert_eq!(config.bindings.drag_move_modifier, "Alt");
    assert_eq!(config.bindings.drag_resize_button, "middle");
    // Unspecified keys inside a section keep their defaults
    assert_eq!(config.bindings.quit, "Super+Shift+q");
    assert_eq!(config.general.startup_command.as_deref(), Some("foot --server"));

    Ok(())
}

#[test]
fn test_partial_configuration() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("partial.toml");

    fs::write(&file_path, "[grab]\nmin_width = 20\n")?;

    let config = PerchConfig::load(&file_path)?;
    assert_eq!(config.grab.min_width, 20);
    assert_eq!(config.grab.min_height, 1);
    assert_eq!(config.bindings, BindingsConfig::default());

    Ok(())
}

#[test]
fn test_zero_minimum_size_is_rejected() {
    let mut config = PerchConfig::default();
    config.grab.min_height = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_unknown_drag_button_is_rejected() {
    let mut config = PerchConfig::default();
    config.bindings.drag_move_button = "button9".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_conflicting_drag_chords_are_rejected() {
    let mut config = PerchConfig::default();
    config.bindings.drag_resize_button = "Left".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_toml_reports_error() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("broken.toml");
    fs::write(&file_path, "[grab\nmin_width = ")?;

    let err = PerchConfig::load(&file_path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));

    Ok(())
}

#[test]
fn test_missing_file_reports_error() {
    let err = PerchConfig::load("/nonexistent/perch/perch.toml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_save_and_reload() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("saved.toml");

    let mut config = PerchConfig::default();
    config.grab.min_width = 48;
    config.save(&file_path)?;

    let reloaded = PerchConfig::load(&file_path)?;
    assert_eq!(reloaded.grab.min_width, 48);

    Ok(())
}

#[test]
fn test_merge_partial_overrides_changed_sections_only() {
    let mut base = PerchConfig::default();
    base.bindings.quit = "Ctrl+Alt+BackSpace".to_string();

    let mut partial = PerchConfig::default();
    partial.grab.min_width = 10;

    let merged = base.merge_partial(partial);
    assert_eq!(merged.grab.min_width, 10);
    assert_eq!(merged.bindings.quit, "Ctrl+Alt+BackSpace");
}

#[test]
fn test_saved_configuration_has_only_known_sections() -> Result<()> {
    let mut config = PerchConfig::default();
    config.general.startup_command = Some("foot".to_string());
    let text = toml::to_string_pretty(&config)?;
    let table: toml::Table = toml::from_str(&text)?;

    let mut sections: Vec<&str> = table.keys().map(String::as_str).collect();
    sections.sort_unstable();
    assert_eq!(sections, ["bindings", "general", "grab"]);

    Ok(())
}
