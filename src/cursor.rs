//! Pointer position tracking

/// Current pointer position in output-pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    x: f64,
    y: f64,
}

impl Cursor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Move the cursor to an absolute position
    pub fn warp(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}
