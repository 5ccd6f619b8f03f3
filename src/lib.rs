//! # Perch Compositor Library
//!
//! The core of a stacking Wayland compositor: a window set, pointer routing,
//! and interactive move/resize grabs.
//!
//! ## Architecture
//!
//! - `window`: the window set (geometry, constraints, focus, stacking)
//! - `cursor`: pointer position
//! - `grab`: interactive move/resize state machine and resize math
//! - `input`: input events, bindings and pointer routing
//! - `server`: compositor state and event loop
//! - `config`: configuration parsing and management
//! - `session`: session bootstrap (config dir, environment, startup commands)
//! - `logging`: logger setup
//!
//! ## Usage
//!
//! ```rust,no_run
//! use perch::{PerchConfig, Server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
//!     let server = Server::new(PerchConfig::default())?;
//!     server.run(rx).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cursor;
pub mod grab;
pub mod input;
pub mod logging;
pub mod server;
pub mod session;
pub mod window;

// Re-export main types for easy access
pub use config::PerchConfig;
pub use cursor::Cursor;
pub use grab::{CursorMode, GrabState, ResizeEdges};
pub use input::{route_pointer, InputEvent, InputManager, PointerRoute};
pub use server::{Dispatch, Server};
pub use window::{Rectangle, View, ViewError, ViewId, WindowManager};

// Re-export common error types
pub use anyhow::{Context, Error, Result};

/// Version information for Perch
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
