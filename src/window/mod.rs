//! Window set
//!
//! This module owns every mapped view of the compositor:
//! - Geometry (position and size) in output-pixel units
//! - Size constraints negotiated with the client
//! - Focus and z-order stacking
//!
//! Views are addressed by [`ViewId`] handles so that other subsystems (the
//! interactive grab in particular) never hold references into the set.

use log::debug;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use thiserror::Error;

/// Opaque handle to a view in the [`WindowManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Errors returned by window set operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("{0} not found")]
    NotFound(ViewId),
    #[error("{0} is not movable")]
    NotMovable(ViewId),
    #[error("{0} is not resizable")]
    NotResizable(ViewId),
}

/// Rectangle for view positioning and sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn loc(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the point lies inside the rectangle (right/bottom edges exclusive)
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64
            && y >= self.y as f64
            && x < self.x as f64 + self.width as f64
            && y < self.y as f64 + self.height as f64
    }
}

/// Size and movement constraints for a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConstraints {
    pub min_width: Option<u32>,
    pub min_height: Option<u32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub resizable: bool,
    pub movable: bool,
}

impl Default for ViewConstraints {
    fn default() -> Self {
        Self {
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            resizable: true,
            movable: true,
        }
    }
}

/// A mapped toplevel window
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub id: ViewId,
    pub title: String,
    pub geometry: Rectangle,
    pub constraints: ViewConstraints,
}

impl View {
    pub fn new(id: ViewId, title: String, geometry: Rectangle) -> Self {
        Self {
            id,
            title,
            geometry,
            constraints: ViewConstraints::default(),
        }
    }
}

#[derive(Debug)]
pub struct WindowManager {
    /// View tracking by id
    views: HashMap<ViewId, View>,

    /// Stacking order (bottom to top)
    stacking_order: VecDeque<ViewId>,

    /// Next view id
    next_view_id: u64,

    /// Currently focused view
    focused_view: Option<ViewId>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
            stacking_order: VecDeque::new(),
            next_view_id: 1,
            focused_view: None,
        }
    }

    /// Map a new view and put it on top of the stack
    pub fn add_view(&mut self, title: impl Into<String>, geometry: Rectangle) -> ViewId {
        let id = ViewId(self.next_view_id);
        self.next_view_id += 1;

        let view = View::new(id, title.into(), geometry);
        debug!("Mapped {} '{}' at {:?}", id, view.title, geometry);
        self.views.insert(id, view);
        self.stacking_order.push_back(id);

        if self.focused_view.is_none() {
            self.focused_view = Some(id);
        }

        id
    }

    /// Unmap a view.
    ///
    /// Callers that hold a grab on the view must release it first; see
    /// [`crate::server::Server::remove_view`].
    pub fn remove_view(&mut self, id: ViewId) -> Option<View> {
        self.stacking_order.retain(|&v| v != id);
        if self.focused_view == Some(id) {
            self.focused_view = self.stacking_order.back().copied();
        }
        let removed = self.views.remove(&id);
        if removed.is_some() {
            debug!("Unmapped {}", id);
        }
        removed
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(&id)
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Commit a full rectangle to a view without applying constraints.
    ///
    /// Used by the interactive grab, which does its own clamping.
    pub fn set_view_geometry(&mut self, id: ViewId, geometry: Rectangle) -> Result<(), ViewError> {
        let view = self.views.get_mut(&id).ok_or(ViewError::NotFound(id))?;
        view.geometry = geometry;
        Ok(())
    }

    /// Move a view to new coordinates
    pub fn move_view(&mut self, id: ViewId, x: i32, y: i32) -> Result<(), ViewError> {
        let view = self.views.get_mut(&id).ok_or(ViewError::NotFound(id))?;
        if !view.constraints.movable {
            return Err(ViewError::NotMovable(id));
        }
        view.geometry.x = x;
        view.geometry.y = y;
        debug!("Moved {} to ({}, {})", id, x, y);
        Ok(())
    }

    /// Resize a view with constraint validation
    pub fn resize_view(&mut self, id: ViewId, width: u32, height: u32) -> Result<(), ViewError> {
        let view = self.views.get_mut(&id).ok_or(ViewError::NotFound(id))?;
        if !view.constraints.resizable {
            return Err(ViewError::NotResizable(id));
        }

        let constraints = &view.constraints;
        let mut final_width = width.max(constraints.min_width.unwrap_or(1)).max(1);
        let mut final_height = height.max(constraints.min_height.unwrap_or(1)).max(1);
        if let Some(max_width) = constraints.max_width {
            final_width = final_width.min(max_width);
        }
        if let Some(max_height) = constraints.max_height {
            final_height = final_height.min(max_height);
        }

        view.geometry.width = final_width;
        view.geometry.height = final_height;
        debug!("Resized {} to {}x{}", id, final_width, final_height);
        Ok(())
    }

    /// Focus a view and raise it to the top of the stack
    pub fn focus_view(&mut self, id: ViewId) -> Result<(), ViewError> {
        if !self.views.contains_key(&id) {
            return Err(ViewError::NotFound(id));
        }
        self.focused_view = Some(id);
        self.stacking_order.retain(|&v| v != id);
        self.stacking_order.push_back(id);
        debug!("Focused {}", id);
        Ok(())
    }

    pub fn focused_view(&self) -> Option<ViewId> {
        self.focused_view
    }

    /// Views from bottom to top
    pub fn stacking_order(&self) -> Vec<ViewId> {
        self.stacking_order.iter().copied().collect()
    }

    /// Topmost view containing the point
    pub fn view_at(&self, x: f64, y: f64) -> Option<ViewId> {
        self.stacking_order
            .iter()
            .rev()
            .copied()
            .find(|id| {
                self.views
                    .get(id)
                    .is_some_and(|view| view.geometry.contains_point(x, y))
            })
    }
}

#[cfg(test)]
mod tests;
