//! Interactive move and resize
//!
//! While a grab is active the compositor stops forwarding pointer events to
//! clients and consumes them itself to reposition or resize a single view.
//!
//! All geometry is derived from the snapshot taken in [`GrabState::begin`]:
//! every [`GrabState::update`] computes `snapshot + (cursor - grab origin)`
//! and never reads back the live view rectangle, so intermediate motion
//! events cannot accumulate rounding or clamping error.
//!
//! ```text
//! Normal --begin(Move|Resize)--> Move|Resize
//! Move|Resize --update(pos)--> Move|Resize
//! Move|Resize --end()--> Normal
//! Move|Resize --begin(..)--> Move|Resize   (previous snapshot discarded)
//! ```

mod resize;

use bitflags::bitflags;
use log::{debug, warn};

use crate::config::GrabConfig;
use crate::cursor::Cursor;
use crate::window::{Rectangle, View, ViewConstraints, ViewId, WindowManager};

pub use resize::{edges_for_point, SizeLimits};

/// What the pointer is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// No grab; pointer events go to clients
    #[default]
    Normal,
    Move,
    Resize,
}

bitflags! {
    /// Borders of a view being dragged during a resize
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResizeEdges: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;

        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();
    }
}

/// Snapshot of an in-progress grab
#[derive(Debug, Clone, PartialEq)]
struct ActiveGrab {
    view: ViewId,
    mode: CursorMode,
    cursor_origin: (f64, f64),
    initial_box: Rectangle,
    edges: ResizeEdges,
}

/// The compositor's single interactive grab slot
#[derive(Debug, Clone, PartialEq)]
pub struct GrabState {
    active: Option<ActiveGrab>,
    min_size: (u32, u32),
}

impl Default for GrabState {
    fn default() -> Self {
        Self::new(&GrabConfig::default())
    }
}

impl GrabState {
    pub fn new(config: &GrabConfig) -> Self {
        Self {
            active: None,
            min_size: (config.min_width.max(1), config.min_height.max(1)),
        }
    }

    /// Apply a new global minimum size. An active grab keeps running.
    pub fn set_min_size(&mut self, width: u32, height: u32) {
        self.min_size = (width.max(1), height.max(1));
    }

    pub fn min_size(&self) -> (u32, u32) {
        self.min_size
    }

    pub fn mode(&self) -> CursorMode {
        self.active.as_ref().map_or(CursorMode::Normal, |grab| grab.mode)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn grabbed_view(&self) -> Option<ViewId> {
        self.active.as_ref().map(|grab| grab.view)
    }

    pub fn grab_cursor_pos(&self) -> Option<(f64, f64)> {
        self.active.as_ref().map(|grab| grab.cursor_origin)
    }

    pub fn grab_box(&self) -> Option<Rectangle> {
        self.active.as_ref().map(|grab| grab.initial_box)
    }

    pub fn resize_edges(&self) -> ResizeEdges {
        self.active
            .as_ref()
            .map_or(ResizeEdges::empty(), |grab| grab.edges)
    }

    /// Start moving or resizing `view`.
    ///
    /// Any grab already in progress is replaced without committing anything
    /// further for it. `edges` only matters for [`CursorMode::Resize`].
    pub fn begin(&mut self, view: &View, cursor: &Cursor, mode: CursorMode, edges: ResizeEdges) {
        debug_assert!(mode != CursorMode::Normal, "grab begun with CursorMode::Normal");
        if mode == CursorMode::Normal {
            warn!("Ignoring grab request for {} without a move/resize mode", view.id);
            return;
        }

        if let Some(previous) = &self.active {
            debug!(
                "Restarting grab: {} ({:?}) replaced by {} ({:?})",
                previous.view, previous.mode, view.id, mode
            );
        }

        self.active = Some(ActiveGrab {
            view: view.id,
            mode,
            cursor_origin: cursor.position(),
            initial_box: view.geometry,
            edges,
        });

        debug!(
            "Grab begin: {:?} {} from {:?} at cursor {:?}, edges {:?}",
            mode,
            view.id,
            view.geometry,
            cursor.position(),
            edges
        );
    }

    /// Geometry the grabbed view should have with the pointer at `cursor_pos`.
    ///
    /// Returns `None` when no grab is active.
    pub fn compute_geometry(&self, cursor_pos: (f64, f64), limits: SizeLimits) -> Option<Rectangle> {
        let grab = self.active.as_ref()?;
        let delta = (
            round_to_i32(cursor_pos.0 - grab.cursor_origin.0),
            round_to_i32(cursor_pos.1 - grab.cursor_origin.1),
        );

        let geometry = match grab.mode {
            CursorMode::Move => Rectangle {
                x: grab.initial_box.x.saturating_add(delta.0),
                y: grab.initial_box.y.saturating_add(delta.1),
                ..grab.initial_box
            },
            CursorMode::Resize => resize::resize_box(grab.initial_box, grab.edges, delta, limits),
            CursorMode::Normal => return None,
        };

        Some(geometry)
    }

    /// Feed a pointer motion into the grab and commit the result to the view.
    ///
    /// If the grabbed view has disappeared from `views` the grab is released
    /// and nothing is committed.
    pub fn update(&mut self, views: &mut WindowManager, cursor_pos: (f64, f64)) -> Option<Rectangle> {
        debug_assert!(self.is_active(), "grab update without an active grab");
        let view_id = self.grabbed_view()?;

        let Some(view) = views.view(view_id) else {
            warn!("Grabbed {} no longer exists, releasing grab", view_id);
            self.end();
            return None;
        };

        let limits = SizeLimits::from_constraints(self.min_size, &view.constraints);
        let geometry = self.compute_geometry(cursor_pos, limits)?;

        if views.set_view_geometry(view_id, geometry).is_err() {
            self.end();
            return None;
        }

        Some(geometry)
    }

    /// Release the grab. Geometry committed so far stays.
    pub fn end(&mut self) {
        if let Some(grab) = self.active.take() {
            debug!("Grab end: {:?} {}", grab.mode, grab.view);
        }
    }
}

impl SizeLimits {
    /// Combine the global minimum with a view's own constraints
    pub fn from_constraints(min_size: (u32, u32), constraints: &ViewConstraints) -> Self {
        Self {
            min_width: min_size.0.max(constraints.min_width.unwrap_or(1)).max(1),
            min_height: min_size.1.max(constraints.min_height.unwrap_or(1)).max(1),
            max_width: constraints.max_width.unwrap_or(u32::MAX),
            max_height: constraints.max_height.unwrap_or(u32::MAX),
        }
    }
}

fn round_to_i32(value: f64) -> i32 {
    // `as` saturates on overflow and maps NaN to 0
    value.round() as i32
}
