//! Text rendering showcase.

use std::fmt::Write;

use monoframe_core::{Buttons, Canvas, Ink};

use super::Scene;

const TICKER: &str = "the quick brown fox jumps over the lazy dog ~ 0123456789 ";

/// Scaled, inverted, wrapped and transparent text.
pub struct TextScene {
    frame: u64,
    big: bool,
}

impl TextScene {
    /// Creates a new text scene.
    pub fn new() -> Self {
        Self {
            frame: 0,
            big: false,
        }
    }
}

impl Default for TextScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for TextScene {
    fn name(&self) -> &str {
        "text"
    }

    fn update(&mut self, frame: u64, buttons: Buttons) {
        self.frame = frame;
        self.big = buttons.contains(Buttons::B);
    }

    fn render(&self, canvas: &mut Canvas) {
        // Header in inverse video
        canvas.set_text_size(1);
        canvas.set_text_wrap(false);
        canvas.set_text_color(Ink::Clear);
        canvas.set_text_background(Ink::Set);
        canvas.set_cursor(0, 0);
        let _ = write!(canvas, " monoframe {:>6} ", self.frame);

        // Large counter, or huge when B is held
        canvas.set_text_color(Ink::Set);
        canvas.set_text_background(Ink::Clear);
        canvas.set_text_size(if self.big { 3 } else { 2 });
        canvas.set_cursor(0, 10);
        let _ = write!(canvas, "{:02}:{:02}", (self.frame / 60) % 60, self.frame % 60);

        // Transparent text over a hatched box
        for x in (88..128).step_by(2) {
            canvas.draw_fast_vline(x, 10, 16, Ink::Set);
        }
        canvas.set_text_size(1);
        canvas.set_text_background(Ink::Invert);
        canvas.set_text_color(Ink::Invert);
        canvas.set_cursor(92, 14);
        canvas.print("°C?");

        // Wrapped ticker scrolling through the pangram
        canvas.set_text_color(Ink::Set);
        canvas.set_text_background(Ink::Clear);
        canvas.set_text_wrap(true);
        canvas.set_cursor(0, 40);
        let start = (self.frame / 4) as usize % TICKER.len();
        let (head, tail) = TICKER.split_at(start);
        canvas.print(tail);
        canvas.print(head);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_wraps_onto_next_lines() {
        let mut scene = TextScene::new();
        scene.update(0, Buttons::NONE);
        let mut canvas = Canvas::new();
        scene.render(&mut canvas);

        // 57 characters at 21 per line leave the cursor on the third line
        assert_eq!(canvas.cursor_y(), 56);
        assert_eq!(canvas.cursor_x(), 15 * 6);
        assert!(canvas.cursor().wrap());
    }

    #[test]
    fn test_header_is_inverse_video() {
        let mut scene = TextScene::new();
        scene.update(0, Buttons::NONE);
        let mut canvas = Canvas::new();
        scene.render(&mut canvas);
        // leading space of the header is a fully lit cell
        for y in 0..8 {
            for x in 0..6 {
                assert!(canvas.get_pixel(x, y).is_on());
            }
        }
    }
}
