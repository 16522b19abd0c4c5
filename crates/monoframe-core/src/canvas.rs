//! Canvas: the rasterizer that owns the framebuffer.
//!
//! Every shape, bitmap and glyph operation bottoms out in [`Canvas::set_pixel`]
//! or in the byte-mask span primitives [`Canvas::draw_fast_hline`] and
//! [`Canvas::draw_fast_vline`]. Geometry outside the screen is clipped, never
//! reported.

use std::fmt;

use crate::bitmap::{Bitmap, XyBitmap};
use crate::font::{Font, CELL_HEIGHT, CELL_WIDTH, GLYPH_WIDTH};
use crate::framebuffer::{Framebuffer, Ink, Pixel};
use crate::text::TextCursor;
use crate::{BANDS, HEIGHT, WIDTH};

const W: i32 = WIDTH as i32;
const H: i32 = HEIGHT as i32;

/// Corner masks for [`Canvas::draw_circle_helper`].
pub mod corner {
    pub const TOP_LEFT: u8 = 0x1;
    pub const TOP_RIGHT: u8 = 0x2;
    pub const BOTTOM_RIGHT: u8 = 0x4;
    pub const BOTTOM_LEFT: u8 = 0x8;
}

/// Half masks for [`Canvas::fill_circle_helper`].
pub mod half {
    pub const RIGHT: u8 = 0x1;
    pub const LEFT: u8 = 0x2;
    pub const BOTH: u8 = RIGHT | LEFT;
}

/// Midpoint circle stepper shared by the outline and fill routines.
///
/// Yields `(x, y)` for each step of the decision variable, starting after the
/// four axis points and ending when `x >= y`.
struct CircleSteps {
    f: i64,
    ddf_x: i64,
    ddf_y: i64,
    x: i64,
    y: i64,
}

impl CircleSteps {
    fn new(r: i64) -> Self {
        Self {
            f: 1 - r,
            ddf_x: 1,
            ddf_y: -2 * r,
            x: 0,
            y: r,
        }
    }
}

impl Iterator for CircleSteps {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.y {
            return None;
        }
        if self.f >= 0 {
            self.y -= 1;
            self.ddf_y += 2;
            self.f += self.ddf_y;
        }
        self.x += 1;
        self.ddf_x += 2;
        self.f += self.ddf_x;
        Some((self.x, self.y))
    }
}

/// The rasterizer.
pub struct Canvas {
    framebuffer: Framebuffer,
    font: Font,
    cursor: TextCursor,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Creates a canvas with a blank framebuffer and the built-in font.
    pub fn new() -> Self {
        Self::with_font(Font::builtin())
    }

    /// Creates a canvas that renders glyphs from `font`.
    pub fn with_font(font: Font) -> Self {
        Self {
            framebuffer: Framebuffer::new(),
            font,
            cursor: TextCursor::default(),
        }
    }

    /// Returns the framebuffer.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Returns the packed buffer bytes.
    pub fn buffer(&self) -> &[u8] {
        self.framebuffer.as_bytes()
    }

    /// Sets every pixel off and homes the text cursor.
    pub fn clear(&mut self) {
        self.framebuffer.clear();
        self.cursor.set_position(0, 0);
    }

    /// Applies `ink` to the whole screen.
    pub fn fill(&mut self, ink: Ink) {
        self.framebuffer.fill(ink);
    }

    /// Writes one pixel. See [`Framebuffer::set_pixel`] for clipping.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, ink: Ink) {
        self.framebuffer.set_pixel(x, y, ink);
    }

    /// Writes one pixel from widened coordinates. Points no `i32` can hold
    /// are dropped.
    fn plot(&mut self, x: i64, y: i64, ink: Ink) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.set_pixel(x, y, ink);
        }
    }

    /// [`Canvas::draw_fast_vline`] from widened coordinates.
    fn vspan(&mut self, x: i64, y: i64, h: i64, ink: Ink) {
        let Ok(x) = i32::try_from(x) else {
            return;
        };
        if h <= 0 {
            return;
        }
        let top = y.clamp(-1, H as i64);
        let bottom = y.saturating_add(h).clamp(-1, H as i64);
        self.draw_fast_vline(x, top as i32, (bottom - top) as i32, ink);
    }

    /// Reads one pixel.
    pub fn get_pixel(&self, x: i32, y: i32) -> Pixel {
        self.framebuffer.get_pixel(x, y)
    }

    // Lines

    /// Draws a line with Bresenham's algorithm.
    ///
    /// Works in `i64` so any pair of `i32` endpoints is safe. A line lying
    /// entirely to one side of the screen is skipped, and the walk starts at
    /// the first on-screen step of the major axis.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, ink: Ink) {
        let outside = (x0 < 0 && x1 < 0)
            || (x0 >= W && x1 >= W)
            || (y0 < 0 && y1 < 0)
            || (y0 >= H && y1 >= H);
        if outside {
            return;
        }

        let (mut x0, mut y0, mut x1, mut y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut y = y0;

        // Only steps along the major axis that land on screen are walked.
        let limit = i64::from(if steep { H } else { W });
        let first = x0.max(0);
        let last = x1.min(limit - 1);
        if first > last {
            return;
        }
        let skipped = (first - x0) as i128;
        if skipped > 0 {
            let (dx, dy) = (dx as i128, dy as i128);
            let rises = (skipped * dy - err as i128 + dx - 1).div_euclid(dx);
            err = (err as i128 - skipped * dy + rises * dx) as i64;
            y += rises as i64 * ystep;
        }

        for x in first..=last {
            if steep {
                self.plot(y, x, ink);
            } else {
                self.plot(x, y, ink);
            }
            err -= dy;
            if err < 0 {
                y += ystep;
                err += dx;
            }
        }
    }

    /// Draws a horizontal run of `w` pixels starting at (x, y).
    ///
    /// Works on whole bytes of one row-band with a single bit mask.
    pub fn draw_fast_hline(&mut self, x: i32, y: i32, w: i32, ink: Ink) {
        if !(0..H).contains(&y) || w <= 0 {
            return;
        }
        let start = x.max(0);
        let end = x.saturating_add(w).min(W);
        if start >= end {
            return;
        }

        let mask = 1u8 << (y & 7);
        if let Some(run) = self
            .framebuffer
            .band_mut((y / 8) as usize)
            .and_then(|band| band.get_mut(start as usize..end as usize))
        {
            run.iter_mut().for_each(|byte| ink.apply(byte, mask));
        }
    }

    /// Draws a vertical run of `h` pixels starting at (x, y).
    ///
    /// Applies one mask per row-band the run touches.
    pub fn draw_fast_vline(&mut self, x: i32, y: i32, h: i32, ink: Ink) {
        if !(0..W).contains(&x) || h <= 0 {
            return;
        }
        let mut top = y.max(0);
        let bottom = y.saturating_add(h).min(H);

        while top < bottom {
            let band = top / 8;
            let band_top = band * 8;
            let band_end = (band_top + 8).min(bottom);
            let lo = (top - band_top) as u32;
            let hi = (band_end - band_top) as u32;
            let mask = (((1u16 << hi) - 1) & !((1u16 << lo) - 1)) as u8;

            if let Some(byte) = self.framebuffer.band_byte_mut(band as usize, x as usize) {
                ink.apply(byte, mask);
            }
            top = band_end;
        }
    }

    // Circles

    /// Returns true when the circle's bounding box misses the screen.
    fn circle_off_screen(cx: i64, cy: i64, r: i64) -> bool {
        cx + r < 0 || cx - r >= W as i64 || cy + r < 0 || cy - r >= H as i64
    }

    /// Draws a circle outline of radius `r` centred on (x0, y0).
    pub fn draw_circle(&mut self, x0: i32, y0: i32, r: i32, ink: Ink) {
        if r < 0 {
            return;
        }
        let (cx, cy, r) = (x0 as i64, y0 as i64, r as i64);
        if Self::circle_off_screen(cx, cy, r) {
            return;
        }
        self.plot(cx, cy + r, ink);
        self.plot(cx, cy - r, ink);
        self.plot(cx + r, cy, ink);
        self.plot(cx - r, cy, ink);

        for (x, y) in CircleSteps::new(r) {
            self.plot(cx + x, cy + y, ink);
            self.plot(cx - x, cy + y, ink);
            self.plot(cx + x, cy - y, ink);
            self.plot(cx - x, cy - y, ink);
            self.plot(cx + y, cy + x, ink);
            self.plot(cx - y, cy + x, ink);
            self.plot(cx + y, cy - x, ink);
            self.plot(cx - y, cy - x, ink);
        }
    }

    /// Draws the quarter-circle arcs selected by `corners` (see [`corner`]).
    ///
    /// The axis points are not drawn; rounded rectangles cover them with
    /// their straight edges.
    pub fn draw_circle_helper(&mut self, x0: i32, y0: i32, r: i32, corners: u8, ink: Ink) {
        let (cx, cy) = (x0 as i64, y0 as i64);
        for (x, y) in CircleSteps::new(r as i64) {
            if corners & corner::BOTTOM_RIGHT != 0 {
                self.plot(cx + x, cy + y, ink);
                self.plot(cx + y, cy + x, ink);
            }
            if corners & corner::TOP_RIGHT != 0 {
                self.plot(cx + x, cy - y, ink);
                self.plot(cx + y, cy - x, ink);
            }
            if corners & corner::BOTTOM_LEFT != 0 {
                self.plot(cx - y, cy + x, ink);
                self.plot(cx - x, cy + y, ink);
            }
            if corners & corner::TOP_LEFT != 0 {
                self.plot(cx - y, cy - x, ink);
                self.plot(cx - x, cy - y, ink);
            }
        }
    }

    /// Draws a filled circle.
    pub fn fill_circle(&mut self, x0: i32, y0: i32, r: i32, ink: Ink) {
        if r < 0 {
            return;
        }
        let r = r as i64;
        if Self::circle_off_screen(x0 as i64, y0 as i64, r) {
            return;
        }
        self.vspan(x0 as i64, y0 as i64 - r, 2 * r + 1, ink);
        self.fill_circle_helper(x0, y0, r as i32, half::BOTH, 0, ink);
    }

    /// Fills the circle halves selected by `halves` (see [`half`]) with
    /// vertical spans, each stretched down by `delta` pixels.
    ///
    /// The centre column is left to the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_circle_helper(
        &mut self,
        x0: i32,
        y0: i32,
        r: i32,
        halves: u8,
        delta: i32,
        ink: Ink,
    ) {
        let (cx, cy, delta) = (x0 as i64, y0 as i64, delta as i64);
        for (x, y) in CircleSteps::new(r as i64) {
            if halves & half::RIGHT != 0 {
                self.vspan(cx + x, cy - y, 2 * y + 1 + delta, ink);
                self.vspan(cx + y, cy - x, 2 * x + 1 + delta, ink);
            }
            if halves & half::LEFT != 0 {
                self.vspan(cx - x, cy - y, 2 * y + 1 + delta, ink);
                self.vspan(cx - y, cy - x, 2 * x + 1 + delta, ink);
            }
        }
    }

    // Rectangles

    /// Draws a rectangle outline. Each outline pixel is touched once, so
    /// `Ink::Invert` leaves the corners flipped.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, ink: Ink) {
        if w <= 0 || h <= 0 {
            return;
        }
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);
        self.draw_fast_hline(x, y, w, ink);
        if h > 1 {
            self.draw_fast_hline(x, bottom, w, ink);
        }
        self.draw_fast_vline(x, y.saturating_add(1), h - 2, ink);
        if w > 1 {
            self.draw_fast_vline(right, y.saturating_add(1), h - 2, ink);
        }
    }

    /// Fills a rectangle by sweeping vertical runs across its columns.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, ink: Ink) {
        if w <= 0 || h <= 0 {
            return;
        }
        let start = x.max(0);
        let end = x.saturating_add(w).min(W);
        for column in start..end {
            self.draw_fast_vline(column, y, h, ink);
        }
    }

    /// Clamps a corner radius to what fits in a `w` x `h` rectangle.
    fn clamp_radius(w: i32, h: i32, r: i32) -> i32 {
        r.clamp(0, w.min(h) / 2)
    }

    /// Draws a rounded rectangle outline.
    ///
    /// `r` is clamped to `min(w, h) / 2`.
    pub fn draw_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, ink: Ink) {
        if w <= 0 || h <= 0 {
            return;
        }
        let r = Self::clamp_radius(w, h, r);
        let (left, top) = (x.saturating_add(r), y.saturating_add(r));
        let right = x.saturating_add(w - r - 1);
        let bottom = y.saturating_add(h - r - 1);

        self.draw_fast_hline(left, y, w - 2 * r, ink); // top
        self.draw_fast_hline(left, y.saturating_add(h - 1), w - 2 * r, ink); // bottom
        self.draw_fast_vline(x, top, h - 2 * r, ink); // left
        self.draw_fast_vline(x.saturating_add(w - 1), top, h - 2 * r, ink); // right

        self.draw_circle_helper(left, top, r, corner::TOP_LEFT, ink);
        self.draw_circle_helper(right, top, r, corner::TOP_RIGHT, ink);
        self.draw_circle_helper(right, bottom, r, corner::BOTTOM_RIGHT, ink);
        self.draw_circle_helper(left, bottom, r, corner::BOTTOM_LEFT, ink);
    }

    /// Draws a filled rounded rectangle.
    ///
    /// The centre block is a plain fill; the left and right caps are circle
    /// halves stretched by `h - 2r - 1`.
    pub fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, ink: Ink) {
        if w <= 0 || h <= 0 {
            return;
        }
        let r = Self::clamp_radius(w, h, r);
        let delta = h - 2 * r - 1;

        let (left, top) = (x.saturating_add(r), y.saturating_add(r));

        self.fill_rect(left, y, w - 2 * r, h, ink);
        self.fill_circle_helper(x.saturating_add(w - r - 1), top, r, half::RIGHT, delta, ink);
        self.fill_circle_helper(left, top, r, half::LEFT, delta, ink);
    }

    // Triangles

    /// Draws a triangle outline.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        ink: Ink,
    ) {
        self.draw_line(x0, y0, x1, y1, ink);
        self.draw_line(x1, y1, x2, y2, ink);
        self.draw_line(x2, y2, x0, y0, ink);
    }

    /// Draws a filled triangle with two scanline passes.
    ///
    /// Vertices are sorted by y (stable, so equal-y vertices keep argument
    /// order). The upper pass walks edges 0-1 and 0-2, the lower pass edges
    /// 1-2 and 0-2. Scanline y1 goes to the upper pass only when the bottom
    /// edge is flat, so no row is filled twice or skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        ink: Ink,
    ) {
        let mut vertices = [(x0, y0), (x1, y1), (x2, y2)];
        vertices.sort_by_key(|&(_, y)| y);
        let [(x0, y0), (x1, y1), (x2, y2)] = vertices.map(|(x, y)| (x as i128, y as i128));

        if y0 == y2 {
            let a = x0.min(x1).min(x2);
            let b = x0.max(x1).max(x2);
            self.draw_span(a, b, y0, ink);
            return;
        }

        let (dx01, dy01) = (x1 - x0, y1 - y0);
        let (dx02, dy02) = (x2 - x0, y2 - y0);
        let (dx12, dy12) = (x2 - x1, y2 - y1);

        let last = if y1 == y2 { y1 } else { y1 - 1 };
        let visible_top = 0;
        let visible_bottom = H as i128 - 1;

        // Upper part: edges 0-1 and 0-2. Skipped entirely when y0 == y1.
        let first = y0.max(visible_top);
        let mut sa = dx01 * (first - y0);
        let mut sb = dx02 * (first - y0);
        for y in first..=last.min(visible_bottom) {
            let a = x0 + sa / dy01;
            let b = x0 + sb / dy02;
            sa += dx01;
            sb += dx02;
            self.draw_span(a, b, y, ink);
        }

        // Lower part: edges 1-2 and 0-2. Skipped entirely when y1 == y2.
        let first = (last + 1).max(visible_top);
        let mut sa = dx12 * (first - y1);
        let mut sb = dx02 * (first - y0);
        for y in first..=y2.min(visible_bottom) {
            let a = x1 + sa / dy12;
            let b = x0 + sb / dy02;
            sa += dx12;
            sb += dx02;
            self.draw_span(a, b, y, ink);
        }
    }

    /// Draws the inclusive span between `a` and `b` on row `y`, in either order.
    fn draw_span(&mut self, a: i128, b: i128, y: i128, ink: Ink) {
        let (lo, hi) = if a > b { (b, a) } else { (a, b) };
        let lo = lo.clamp(-1, W as i128);
        let hi = hi.clamp(-1, W as i128);
        let y = y.clamp(-1, H as i128);
        self.draw_fast_hline(lo as i32, y as i32, (hi - lo + 1) as i32, ink);
    }

    // Bitmaps

    /// Blits a packed bitmap with its top-left corner at (x, y).
    ///
    /// When `y` is not a multiple of 8 each source byte straddles two
    /// destination bands: the low part is shifted up into band `y / 8`, the
    /// high part down into the band below.
    pub fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap<'_>, ink: Ink) {
        let w = bitmap.width() as i32;
        let h = bitmap.height() as i32;
        if x.saturating_add(w) <= 0 || x >= W || y.saturating_add(h) <= 0 || y >= H {
            return;
        }

        let y_offset = y.rem_euclid(8) as u32;
        let first_band = y.div_euclid(8);
        let col_start = (-x).max(0);
        let col_end = w.min(W - x);

        for src_band in 0..bitmap.bands() {
            let band = first_band + src_band as i32;
            if band >= BANDS as i32 {
                break;
            }
            if band < -1 {
                continue;
            }

            for col in col_start..col_end {
                let src = bitmap.byte(src_band, col as usize);
                if src == 0 {
                    continue;
                }
                let dest_x = (x + col) as usize;

                if band >= 0 {
                    let upper = ((src as u16) << y_offset) as u8;
                    if let Some(byte) = self.framebuffer.band_byte_mut(band as usize, dest_x) {
                        ink.apply(byte, upper);
                    }
                }
                if y_offset != 0 && band + 1 < BANDS as i32 {
                    let lower = src >> (8 - y_offset);
                    if let Some(byte) =
                        self.framebuffer.band_byte_mut((band + 1) as usize, dest_x)
                    {
                        ink.apply(byte, lower);
                    }
                }
            }
        }
    }

    /// Blits a row-major MSB-first bitmap one pixel at a time. Only set
    /// source bits are drawn.
    pub fn draw_slow_xy_bitmap(&mut self, x: i32, y: i32, bitmap: &XyBitmap<'_>, ink: Ink) {
        let w = bitmap.width() as i32;
        let h = bitmap.height() as i32;
        if x.saturating_add(w) <= 0 || x >= W || y.saturating_add(h) <= 0 || y >= H {
            return;
        }

        for yi in 0..bitmap.height() {
            for xi in 0..bitmap.width() {
                if bitmap.is_set(xi, yi) {
                    self.set_pixel(x + xi as i32, y + yi as i32, ink);
                }
            }
        }
    }

    // Text

    /// Draws one glyph cell (5x7 glyph plus spacing, 6x8) scaled by `size`.
    ///
    /// Glyph bits use `color`, the rest of the cell uses `background`. When
    /// both are the same the background is transparent and left untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_char(
        &mut self,
        x: i32,
        y: i32,
        code: u8,
        color: Ink,
        background: Ink,
        size: u8,
    ) {
        let size = size.max(1) as i32;
        let draw_background = color != background;

        if x >= W
            || y >= H
            || x.saturating_add(CELL_WIDTH * size - 1) < 0
            || y.saturating_add(CELL_HEIGHT * size - 1) < 0
        {
            return;
        }

        for i in 0..CELL_WIDTH {
            let mut line = if (i as usize) < GLYPH_WIDTH {
                self.font.column(code, i as usize)
            } else {
                0
            };

            for j in 0..CELL_HEIGHT {
                let lit = line & 0x1 != 0;
                line >>= 1;
                if !lit && !draw_background {
                    continue;
                }
                let ink = if lit { color } else { background };
                if size == 1 {
                    self.set_pixel(x + i, y + j, ink);
                } else {
                    self.fill_rect(x + i * size, y + j * size, size, size, ink);
                }
            }
        }
    }

    /// Returns the text cursor.
    pub fn cursor(&self) -> &TextCursor {
        &self.cursor
    }

    /// Returns the text cursor for modification.
    pub fn cursor_mut(&mut self) -> &mut TextCursor {
        &mut self.cursor
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor.set_position(x, y);
    }

    pub fn cursor_x(&self) -> i32 {
        self.cursor.x()
    }

    pub fn cursor_y(&self) -> i32 {
        self.cursor.y()
    }

    pub fn set_text_color(&mut self, color: Ink) {
        self.cursor.set_color(color);
    }

    pub fn set_text_background(&mut self, background: Ink) {
        self.cursor.set_background(background);
    }

    pub fn set_text_size(&mut self, size: u8) {
        self.cursor.set_size(size);
    }

    pub fn set_text_wrap(&mut self, wrap: bool) {
        self.cursor.set_wrap(wrap);
    }

    /// Writes one character code at the cursor and advances it.
    ///
    /// `\n` starts a new line, `\r` is ignored. With wrapping on, the line
    /// break is taken before a glyph that would cross the right edge.
    pub fn write_byte(&mut self, code: u8) {
        match code {
            b'\n' => self.cursor.newline(),
            b'\r' => {}
            _ => {
                if self.cursor.should_wrap() {
                    self.cursor.newline();
                }
                let c = self.cursor;
                self.draw_char(c.x(), c.y(), code, c.color(), c.background(), c.size());
                self.cursor.advance();
            }
        }
    }

    /// Writes a string at the cursor. Non-ASCII characters print as `?`.
    pub fn print(&mut self, text: &str) {
        for ch in text.chars() {
            let code = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.write_byte(code);
        }
    }
}

impl fmt::Write for Canvas {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s);
        Ok(())
    }
}
