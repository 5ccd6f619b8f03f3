//! Configuration management for Perch
//!
//! This module handles loading, parsing, and validating configuration
//! from TOML files. It combines settings for interactive grabs,
//! bindings, and general compositor behaviour.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the main configuration inside the config directory
pub const CONFIG_FILE_NAME: &str = "perch.toml";

/// Main configuration struct containing all Perch settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PerchConfig {
    /// Interactive move/resize settings
    #[serde(default)]
    pub grab: GrabConfig,

    /// Key and pointer bindings
    #[serde(default)]
    pub bindings: BindingsConfig,

    /// General compositor settings
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Interactive move/resize configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrabConfig {
    /// Smallest width a resize may produce (pixels, at least 1)
    pub min_width: u32,

    /// Smallest height a resize may produce (pixels, at least 1)
    pub min_height: u32,

    /// Focus and raise a view when a grab starts on it
    pub raise_on_begin: bool,
}

/// Key bindings configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BindingsConfig {
    /// Quit compositor
    pub quit: String,

    /// Re-read the configuration file
    pub reconfigure: String,

    /// Drag move chord modifier(s), e.g., "Super" or "Super+Shift"
    pub drag_move_modifier: String,
    /// Pointer button for drag move ("left", "right", "middle")
    pub drag_move_button: String,

    /// Drag resize chord modifier(s)
    pub drag_resize_modifier: String,
    /// Pointer button for drag resize
    pub drag_resize_button: String,
}

/// General compositor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Command run once the compositor is up
    pub startup_command: Option<String>,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            min_width: 1,
            min_height: 1,
            raise_on_begin: true,
        }
    }
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            quit: "Super+Shift+q".to_string(),
            reconfigure: "Super+Shift+r".to_string(),
            drag_move_modifier: String::from("Super"),
            drag_move_button: String::from("left"),
            drag_resize_modifier: String::from("Super"),
            drag_resize_button: String::from("right"),
        }
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_home<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.starts_with("~") {
        let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
        Ok(Path::new(&home).join(path.strip_prefix("~").unwrap_or(path)))
    } else {
        Ok(path.to_path_buf())
    }
}

impl PerchConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_home(path)?;

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config: PerchConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.grab.min_width == 0 || self.grab.min_height == 0 {
            anyhow::bail!("Invalid grab minimum size: width and height must be at least 1");
        }

        let valid_buttons = ["left", "right", "middle"];
        for button in [
            &self.bindings.drag_move_button,
            &self.bindings.drag_resize_button,
        ] {
            if !valid_buttons.contains(&button.to_ascii_lowercase().as_str()) {
                anyhow::bail!("Invalid drag button: {}", button);
            }
        }

        let move_chord = (
            self.bindings.drag_move_modifier.to_ascii_lowercase(),
            self.bindings.drag_move_button.to_ascii_lowercase(),
        );
        let resize_chord = (
            self.bindings.drag_resize_modifier.to_ascii_lowercase(),
            self.bindings.drag_resize_button.to_ascii_lowercase(),
        );
        if !move_chord.0.is_empty() && move_chord == resize_chord {
            anyhow::bail!(
                "Drag move and drag resize are bound to the same chord: {}+{}",
                move_chord.0,
                move_chord.1
            );
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Merge a partial configuration into this one
    /// Non-default sections from the partial config override this config
    pub fn merge_partial(mut self, partial: PerchConfig) -> Self {
        let default_config = PerchConfig::default();

        if partial.grab != default_config.grab {
            self.grab = partial.grab;
        }
        if partial.bindings != default_config.bindings {
            self.bindings = partial.bindings;
        }
        if partial.general != default_config.general {
            self.general = partial.general;
        }

        self
    }
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod property_tests;
