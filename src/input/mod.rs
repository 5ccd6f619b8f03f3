//! Pointer and keyboard input handling
//!
//! Tracks held modifiers, turns raw events into
//! compositor actions, and decides where pointer events are delivered.

use crate::config::BindingsConfig;
use crate::grab::GrabState;
use anyhow::{anyhow, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::str::FromStr;

/// Raw input events fed to the compositor
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Keyboard key press/release
    Keyboard {
        key: String,
        modifiers: Vec<String>,
        pressed: bool,
    },
    /// Pointer button press/release
    PointerButton {
        button: MouseButton,
        pressed: bool,
        x: f64,
        y: f64,
    },
    /// Absolute pointer motion
    PointerMotion { x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

impl FromStr for MouseButton {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "middle" => Ok(Self::Middle),
            other => Err(anyhow!("Unknown mouse button: {}", other)),
        }
    }
}

/// Compositor actions triggered by input
#[derive(Debug, Clone, PartialEq)]
pub enum CompositorAction {
    /// Start an interactive move of the view under the pointer
    BeginMove { x: f64, y: f64 },
    /// Start an interactive resize of the view under the pointer
    BeginResize { x: f64, y: f64 },
    /// Pointer moved
    PointerMotion { x: f64, y: f64 },
    /// Pointer button event to be routed
    PointerButton {
        button: MouseButton,
        pressed: bool,
        x: f64,
        y: f64,
    },
    Reconfigure,
    Quit,
}

/// Where a pointer event goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRoute {
    /// Deliver to the client surface under the cursor
    Client,
    /// Consume in the compositor's interactive grab
    Grab,
}

/// Decide whether pointer events belong to clients or to the active grab
pub fn route_pointer(grab: &GrabState) -> PointerRoute {
    if grab.is_active() {
        PointerRoute::Grab
    } else {
        PointerRoute::Client
    }
}

/// A modifier set plus pointer button that starts a drag
#[derive(Debug, Clone, PartialEq, Eq)]
struct DragChord {
    modifiers: Vec<String>,
    button: MouseButton,
}

impl DragChord {
    fn parse(modifiers: &str, button: &str) -> Result<Option<Self>> {
        let modifiers = parse_modifiers(modifiers);
        if modifiers.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            modifiers,
            button: button.parse()?,
        }))
    }

    fn matches(&self, held: &[String], button: MouseButton) -> bool {
        self.button == button && self.modifiers.iter().all(|m| held.contains(m))
    }
}

fn parse_modifiers(combo: &str) -> Vec<String> {
    combo.split('+')
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty())
        .collect()
}

/// Input manager: modifier tracking, key bindings and drag chords
#[derive(Debug)]
pub struct InputManager {
    /// Key combo -> action
    key_bindings: HashMap<String, CompositorAction>,

    drag_move: Option<DragChord>,
    drag_resize: Option<DragChord>,

    /// Current modifier state (lowercase)
    active_modifiers: Vec<String>,
}

impl InputManager {
    pub fn new(bindings_config: &BindingsConfig) -> Result<Self> {
        let mut manager = Self {
            key_bindings: HashMap::new(),
            drag_move: None,
            drag_resize: None,
            active_modifiers: Vec::new(),
        };
        manager.apply_bindings(bindings_config)?;
        info!("⌨️ Input manager ready");
        Ok(manager)
    }

    /// Replace bindings, e.g. after a configuration reload
    pub fn apply_bindings(&mut self, bindings_config: &BindingsConfig) -> Result<()> {
        let mut key_bindings = HashMap::new();
        key_bindings.insert(normalize_combo(&bindings_config.quit), CompositorAction::Quit);
        key_bindings.insert(
            normalize_combo(&bindings_config.reconfigure),
            CompositorAction::Reconfigure,
        );

        self.drag_move = DragChord::parse(
            &bindings_config.drag_move_modifier,
            &bindings_config.drag_move_button,
        )?;
        self.drag_resize = DragChord::parse(
            &bindings_config.drag_resize_modifier,
            &bindings_config.drag_resize_button,
        )?;
        self.key_bindings = key_bindings;

        debug!("🔑 Loaded {} key bindings", self.key_bindings.len());
        Ok(())
    }

    /// Process an input event and return any triggered actions
    pub fn process_input_event(&mut self, event: InputEvent) -> Vec<CompositorAction> {
        match event {
            InputEvent::Keyboard {
                key,
                modifiers,
                pressed,
            } => self.process_keyboard_event(key, modifiers, pressed),
            InputEvent::PointerButton {
                button,
                pressed,
                x,
                y,
            } => self.process_pointer_button(button, pressed, x, y),
            InputEvent::PointerMotion { x, y } => vec![CompositorAction::PointerMotion { x, y }],
        }
    }

    fn process_keyboard_event(
        &mut self,
        key: String,
        modifiers: Vec<String>,
        pressed: bool,
    ) -> Vec<CompositorAction> {
        let modifiers: Vec<String> = modifiers.iter().map(|m| m.to_ascii_lowercase()).collect();

        if pressed {
            for modifier in &modifiers {
                if !self.active_modifiers.contains(modifier) {
                    self.active_modifiers.push(modifier.clone());
                }
            }

            let key_combo = combo_key(modifiers.clone(), &key.to_ascii_lowercase());

            debug!("⌨️ Key pressed: {}", key_combo);

            if let Some(action) = self.key_bindings.get(&key_combo) {
                info!("🚀 Triggered action: {:?}", action);
                return vec![action.clone()];
            }
        } else {
            self.active_modifiers.retain(|m| !modifiers.contains(m));
        }

        Vec::new()
    }

    fn process_pointer_button(
        &self,
        button: MouseButton,
        pressed: bool,
        x: f64,
        y: f64,
    ) -> Vec<CompositorAction> {
        if pressed {
            let held = &self.active_modifiers;
            if self.drag_move.as_ref().is_some_and(|c| c.matches(held, button)) {
                debug!("🐁 Drag move chord at ({:.1}, {:.1})", x, y);
                return vec![CompositorAction::BeginMove { x, y }];
            }
            if self.drag_resize.as_ref().is_some_and(|c| c.matches(held, button)) {
                debug!("🐁 Drag resize chord at ({:.1}, {:.1})", x, y);
                return vec![CompositorAction::BeginResize { x, y }];
            }
        }

        vec![CompositorAction::PointerButton {
            button,
            pressed,
            x,
            y,
        }]
    }

    /// Check if a modifier is currently held
    pub fn is_modifier_active(&self, modifier: &str) -> bool {
        self.active_modifiers.contains(&modifier.to_ascii_lowercase())
    }
}

/// Lowercase a "Mod+Mod+key" combo so lookups are case-insensitive and
/// independent of modifier order
fn normalize_combo(combo: &str) -> String {
    let mut parts = parse_modifiers(combo);
    match parts.pop() {
        Some(key) => combo_key(parts, &key),
        None => String::new(),
    }
}

/// Lookup key for a held modifier set plus key; modifiers are sorted
fn combo_key(mut modifiers: Vec<String>, key: &str) -> String {
    modifiers.sort_unstable();
    modifiers.dedup();
    modifiers.push(key.to_string());
    modifiers.join("+")
}
