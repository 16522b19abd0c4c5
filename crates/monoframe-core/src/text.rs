//! Text cursor state for sequential glyph output.

use crate::font::{CELL_HEIGHT, CELL_WIDTH};
use crate::framebuffer::Ink;
use crate::WIDTH;

/// Cursor position and style used by [`Canvas::write_byte`](crate::Canvas::write_byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCursor {
    x: i32,
    y: i32,
    color: Ink,
    background: Ink,
    size: u8,
    wrap: bool,
}

impl Default for TextCursor {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            color: Ink::Set,
            background: Ink::Clear,
            size: 1,
            wrap: false,
        }
    }
}

impl TextCursor {
    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn color(&self) -> Ink {
        self.color
    }

    pub fn background(&self) -> Ink {
        self.background
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_color(&mut self, color: Ink) {
        self.color = color;
    }

    pub fn set_background(&mut self, background: Ink) {
        self.background = background;
    }

    /// Sets the integer glyph scale. Zero is raised to 1.
    pub fn set_size(&mut self, size: u8) {
        self.size = size.max(1);
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    /// Horizontal advance per character.
    pub fn advance_x(&self) -> i32 {
        self.size as i32 * CELL_WIDTH
    }

    /// Vertical advance per line.
    pub fn advance_y(&self) -> i32 {
        self.size as i32 * CELL_HEIGHT
    }

    /// Moves to the start of the next line.
    pub fn newline(&mut self) {
        self.x = 0;
        self.y = self.y.saturating_add(self.advance_y());
    }

    /// Returns true if the next glyph has to go on a new line first.
    ///
    /// A cursor already at column 0 never wraps, so a glyph wider than the
    /// screen is drawn clipped instead of looping.
    pub fn should_wrap(&self) -> bool {
        self.wrap && self.x > 0 && self.x.saturating_add(self.advance_x()) > WIDTH as i32
    }

    /// Moves past the glyph just drawn.
    pub fn advance(&mut self) {
        self.x = self.x.saturating_add(self.advance_x());
    }
}
