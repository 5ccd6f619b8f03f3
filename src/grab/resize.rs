//! Edge-aware resize math

use super::ResizeEdges;
use crate::window::Rectangle;

/// Size bounds applied while resizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_width: 1,
            min_height: 1,
            max_width: u32::MAX,
            max_height: u32::MAX,
        }
    }
}

/// Resize `initial` by `delta` along the dragged `edges`.
///
/// LEFT/TOP are applied before RIGHT/BOTTOM, so a mask holding both edges of
/// an axis translates the box along that axis.
pub(super) fn resize_box(
    initial: Rectangle,
    edges: ResizeEdges,
    delta: (i32, i32),
    limits: SizeLimits,
) -> Rectangle {
    let (x, width) = resize_axis(
        initial.x,
        initial.width,
        delta.0,
        edges.contains(ResizeEdges::LEFT),
        edges.contains(ResizeEdges::RIGHT),
        (limits.min_width, limits.max_width),
    );
    let (y, height) = resize_axis(
        initial.y,
        initial.height,
        delta.1,
        edges.contains(ResizeEdges::TOP),
        edges.contains(ResizeEdges::BOTTOM),
        (limits.min_height, limits.max_height),
    );

    Rectangle {
        x,
        y,
        width,
        height,
    }
}

/// One axis of a resize. `start_edge` is LEFT or TOP, `end_edge` RIGHT or BOTTOM.
fn resize_axis(
    origin: i32,
    length: u32,
    delta: i32,
    start_edge: bool,
    end_edge: bool,
    (min, max): (u32, u32),
) -> (i32, u32) {
    let origin = i64::from(origin);
    let length = i64::from(length);
    let delta = i64::from(delta);

    let mut start = origin;
    let mut size = length;
    if start_edge {
        start += delta;
        size -= delta;
    }
    if end_edge {
        size += delta;
    }

    let min = i64::from(min.max(1));
    let max = i64::from(max).max(min);
    let clamped = size.clamp(min, max);

    // Dragging only the start edge keeps the far edge where it was
    if clamped != size && start_edge && !end_edge {
        start = origin + length - clamped;
    }

    (saturate_i32(start), clamped as u32)
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Pick resize edges from the quadrant of `rect` the point lies in.
///
/// Used for modifier-drag resizing, where there is no decoration to tell
/// which border was grabbed.
pub fn edges_for_point(rect: &Rectangle, x: f64, y: f64) -> ResizeEdges {
    let center_x = rect.x as f64 + rect.width as f64 / 2.0;
    let center_y = rect.y as f64 + rect.height as f64 / 2.0;

    let horizontal = if x < center_x {
        ResizeEdges::LEFT
    } else {
        ResizeEdges::RIGHT
    };
    let vertical = if y < center_y {
        ResizeEdges::TOP
    } else {
        ResizeEdges::BOTTOM
    };

    horizontal | vertical
}
