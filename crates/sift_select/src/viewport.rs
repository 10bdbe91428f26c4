//! Fixed-row-height virtual viewport
//!
//! Works out which slice of a (potentially huge) list is on screen so only
//! those rows need to be rendered. Drawing the rows is up to the host.

use std::ops::Range;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 32.0;

/// Scroll state for a list of equally tall rows
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualViewport {
    row_height: f32,
    scroll_offset: f32,
    /// Extra rows rendered above and below the visible window
    overscan: usize,
}

impl Default for VirtualViewport {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT)
    }
}

impl VirtualViewport {
    /// Create a viewport scrolled to the top
    pub fn new(row_height: f32) -> Self {
        Self {
            row_height: row_height.max(1.0),
            scroll_offset: 0.0,
            overscan: 0,
        }
    }

    /// Render `rows` extra rows on each side of the visible window
    pub fn overscan(mut self, rows: usize) -> Self {
        self.overscan = rows;
        self
    }

    /// Height of one row
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Current scroll offset in pixels
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Height of the viewport for a visible-row hint
    pub fn height(&self, visible_rows: usize) -> f32 {
        visible_rows.max(1) as f32 * self.row_height
    }

    /// Total scrollable height for `total` rows
    pub fn content_height(&self, total: usize) -> f32 {
        total as f32 * self.row_height
    }

    fn max_offset(&self, total: usize, visible_rows: usize) -> f32 {
        (self.content_height(total) - self.height(visible_rows)).max(0.0)
    }

    /// Indices of the rows to render
    pub fn visible_range(&self, total: usize, visible_rows: usize) -> Range<usize> {
        if total == 0 {
            return 0..0;
        }
        let first = (self.scroll_offset / self.row_height).floor() as usize;
        let on_screen = visible_rows.max(1) + 1;
        let start = first.saturating_sub(self.overscan).min(total);
        let end = first
            .saturating_add(on_screen)
            .saturating_add(self.overscan)
            .min(total);
        start..end
    }

    /// Scroll by `delta` pixels, clamped to the content
    pub fn scroll_by(&mut self, delta: f32, total: usize, visible_rows: usize) {
        let max = self.max_offset(total, visible_rows);
        self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, max);
    }

    /// Scroll the minimum amount needed to bring row `index` into view
    pub fn scroll_to(&mut self, index: usize, total: usize, visible_rows: usize) {
        if total == 0 {
            self.scroll_offset = 0.0;
            return;
        }
        let index = index.min(total - 1);
        let top = index as f32 * self.row_height;
        let bottom = top + self.row_height;
        let height = self.height(visible_rows);

        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if bottom > self.scroll_offset + height {
            self.scroll_offset = bottom - height;
        }
        self.scroll_offset = self
            .scroll_offset
            .clamp(0.0, self.max_offset(total, visible_rows));
    }

    /// Back to the top (after the list is replaced)
    pub fn reset(&mut self) {
        self.scroll_offset = 0.0;
    }
}
