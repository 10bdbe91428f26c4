//! Screen-space geometry shared by the element tree and positioning

/// Axis-aligned rectangle in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Y coordinate of the bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// X coordinate of the right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Check whether a point lies inside the rectangle (edges inclusive)
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}
