//! Core compositor state
//!
//! This module contains the [`Server`] struct and its event loop. It ties the
//! window set, cursor, input manager and the interactive grab together and
//! decides, per pointer event, whether a client or the grab receives it.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

use crate::config::PerchConfig;
use crate::cursor::Cursor;
use crate::grab::{edges_for_point, CursorMode, GrabState, ResizeEdges};
use crate::input::{route_pointer, CompositorAction, InputEvent, InputManager, PointerRoute};
use crate::window::{Rectangle, View, ViewError, ViewId, WindowManager};

/// Outcome of dispatching one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Forwarded to the client of this view (or to nobody)
    Client(Option<ViewId>),
    /// Consumed by the interactive grab
    Grab,
    /// Handled by the compositor itself (bindings, reconfigure)
    Compositor,
    /// Compositor should stop
    Quit,
}

/// Compositor instance state
pub struct Server {
    config: PerchConfig,
    config_path: Option<PathBuf>,

    views: WindowManager,
    cursor: Cursor,
    grab: GrabState,
    input: InputManager,

    running: bool,
}

impl Server {
    pub fn new(config: PerchConfig) -> Result<Self> {
        info!("🏗️ Initializing compositor state...");
        let input = InputManager::new(&config.bindings).context("Invalid bindings")?;
        let grab = GrabState::new(&config.grab);

        Ok(Self {
            config,
            config_path: None,
            views: WindowManager::new(),
            cursor: Cursor::default(),
            grab,
            input,
            running: false,
        })
    }

    /// Remember where the configuration came from so SIGHUP can re-read it
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn config(&self) -> &PerchConfig {
        &self.config
    }

    pub fn views(&self) -> &WindowManager {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut WindowManager {
        &mut self.views
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn grab(&self) -> &GrabState {
        &self.grab
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.view(id)
    }

    /// Map a new view
    pub fn add_view(&mut self, title: impl Into<String>, geometry: Rectangle) -> ViewId {
        self.views.add_view(title, geometry)
    }

    /// Unmap a view, releasing any grab that still points at it
    pub fn remove_view(&mut self, id: ViewId) -> Option<View> {
        if self.grab.grabbed_view() == Some(id) {
            debug!("Releasing grab on unmapped {}", id);
            self.grab.end();
        }
        self.views.remove_view(id)
    }

    /// Start an interactive move or resize.
    ///
    /// This is the entry point for decoration hit-tests, which know the
    /// grabbed edges; modifier drags go through [`Server::handle_input_event`].
    pub fn begin_interactive(
        &mut self,
        id: ViewId,
        mode: CursorMode,
        edges: ResizeEdges,
    ) -> Result<(), ViewError> {
        let view = self.views.view(id).ok_or(ViewError::NotFound(id))?;
        match mode {
            CursorMode::Move if !view.constraints.movable => return Err(ViewError::NotMovable(id)),
            CursorMode::Resize if !view.constraints.resizable => {
                return Err(ViewError::NotResizable(id))
            }
            _ => {}
        }

        let edges = if mode == CursorMode::Resize {
            edges
        } else {
            ResizeEdges::empty()
        };
        self.grab.begin(view, &self.cursor, mode, edges);

        if self.config.grab.raise_on_begin {
            self.views.focus_view(id)?;
        }
        Ok(())
    }

    /// Feed one input event through bindings, routing and the grab
    pub fn handle_input_event(&mut self, event: InputEvent) -> Dispatch {
        let actions = self.input.process_input_event(event);
        // Unbound keys go to the focused client
        let mut dispatch = Dispatch::Client(self.views.focused_view());
        for action in actions {
            dispatch = self.handle_action(action);
        }
        dispatch
    }

    fn handle_action(&mut self, action: CompositorAction) -> Dispatch {
        match action {
            CompositorAction::PointerMotion { x, y } => {
                self.cursor.warp(x, y);
                match route_pointer(&self.grab) {
                    PointerRoute::Grab => {
                        self.grab.update(&mut self.views, (x, y));
                        Dispatch::Grab
                    }
                    PointerRoute::Client => Dispatch::Client(self.views.view_at(x, y)),
                }
            }
            CompositorAction::PointerButton {
                button,
                pressed,
                x,
                y,
            } => {
                self.cursor.warp(x, y);
                match route_pointer(&self.grab) {
                    PointerRoute::Grab => {
                        if !pressed {
                            debug!("🐁 {:?} released, ending grab", button);
                            self.grab.end();
                        }
                        Dispatch::Grab
                    }
                    PointerRoute::Client => {
                        let target = self.views.view_at(x, y);
                        if pressed {
                            if let Some(id) = target {
                                let _ = self.views.focus_view(id);
                            }
                        }
                        Dispatch::Client(target)
                    }
                }
            }
            CompositorAction::BeginMove { x, y } => self.begin_at(x, y, CursorMode::Move),
            CompositorAction::BeginResize { x, y } => self.begin_at(x, y, CursorMode::Resize),
            CompositorAction::Reconfigure => {
                if let Err(e) = self.reload_config() {
                    warn!("⚠️ Failed to reload configuration: {:#}", e);
                }
                Dispatch::Compositor
            }
            CompositorAction::Quit => {
                self.running = false;
                Dispatch::Quit
            }
        }
    }

    /// Modifier drag: grab whatever view is under the pointer
    fn begin_at(&mut self, x: f64, y: f64, mode: CursorMode) -> Dispatch {
        self.cursor.warp(x, y);
        let Some(id) = self.views.view_at(x, y) else {
            debug!("No view under pointer at ({:.1}, {:.1}), ignoring drag", x, y);
            return Dispatch::Client(None);
        };

        let edges = match (mode, self.views.view(id)) {
            (CursorMode::Resize, Some(view)) => edges_for_point(&view.geometry, x, y),
            _ => ResizeEdges::empty(),
        };

        match self.begin_interactive(id, mode, edges) {
            Ok(()) => Dispatch::Grab,
            Err(e) => {
                debug!("Drag refused: {}", e);
                Dispatch::Client(Some(id))
            }
        }
    }

    /// Re-read the configuration file this server was started with
    pub fn reload_config(&mut self) -> Result<()> {
        let Some(path) = self.config_path.clone() else {
            debug!("No configuration file to reload");
            return Ok(());
        };

        let config = PerchConfig::load(&path)?;
        self.input.apply_bindings(&config.bindings)?;
        self.grab
            .set_min_size(config.grab.min_width, config.grab.min_height);
        self.config = config;
        info!("🔄 Configuration reloaded from {}", path.display());
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run the event loop until a signal, a quit binding, or the input
    /// channel closes
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<InputEvent>) -> Result<Self> {
        info!("🎬 Starting compositor event loop");

        self.running = true;

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sighup = signal(SignalKind::hangup())?;

        while self.running {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("📨 Received SIGTERM, shutting down gracefully");
                    self.running = false;
                }
                _ = sigint.recv() => {
                    info!("📨 Received SIGINT (Ctrl+C), shutting down gracefully");
                    self.running = false;
                }
                _ = sighup.recv() => {
                    info!("📨 Received SIGHUP, reloading configuration");
                    if let Err(e) = self.reload_config() {
                        warn!("⚠️ Failed to reload configuration: {:#}", e);
                    }
                }
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle_input_event(event);
                    }
                    None => {
                        info!("🔌 Input source closed");
                        self.running = false;
                    }
                },
            }
        }

        self.shutdown();
        info!("🛑 Compositor event loop finished");
        Ok(self)
    }

    fn shutdown(&mut self) {
        info!("🔽 Shutting down compositor...");
        self.running = false;
        self.grab.end();
    }
}
