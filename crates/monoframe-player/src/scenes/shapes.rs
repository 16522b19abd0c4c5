//! Geometry showcase.
//!
//! Layout (128x64):
//! ```text
//! +--------------------------------------+
//! | (rrect) [fill rrect]   (o)  corners |
//! |  /\      /#\       ----  \  |        |
//! | /__\    /###\    sweep    spinner    |
//! +--------------------------------------+
//! ```

use monoframe_core::canvas::corner;
use monoframe_core::{Buttons, Canvas, Ink};

use super::Scene;

/// Spinner arm length.
const SPINNER_RADIUS: f32 = 12.0;

/// Draws every primitive with a little motion.
pub struct ShapesScene {
    frame: u64,
    inverted: bool,
}

impl ShapesScene {
    /// Creates a new shapes scene.
    pub fn new() -> Self {
        Self {
            frame: 0,
            inverted: false,
        }
    }
}

impl Default for ShapesScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for ShapesScene {
    fn name(&self) -> &str {
        "shapes"
    }

    fn update(&mut self, frame: u64, buttons: Buttons) {
        self.frame = frame;
        self.inverted = buttons.contains(Buttons::A);
    }

    fn render(&self, canvas: &mut Canvas) {
        let t = self.frame as i32;

        canvas.draw_rect(0, 0, 128, 64, Ink::Set);

        // Rounded rectangles, radius breathing between 0 and 10
        let r = (t / 4) % 20;
        let r = if r > 10 { 20 - r } else { r };
        canvas.draw_round_rect(4, 4, 34, 22, r, Ink::Set);
        canvas.fill_round_rect(42, 4, 34, 22, 10 - r, Ink::Set);

        // Circle with a pulsing core
        canvas.draw_circle(94, 15, 11, Ink::Set);
        canvas.fill_circle(94, 15, (t / 3) % 9, Ink::Set);

        // One quarter arc at a time, walking round the corners
        let corners = [
            corner::TOP_LEFT,
            corner::TOP_RIGHT,
            corner::BOTTOM_RIGHT,
            corner::BOTTOM_LEFT,
        ];
        let arc = corners[(t / 10) as usize % corners.len()];
        canvas.draw_circle_helper(116, 15, 8, arc, Ink::Set);

        // Triangles, the filled one rocking its apex
        canvas.draw_triangle(6, 58, 20, 32, 36, 58, Ink::Set);
        let apex = 54 + ((t / 2) % 16 - 8).abs() - 4;
        canvas.fill_triangle(42, 58, apex, 32, 66, 58, Ink::Set);

        // Tick marks
        for i in 0..8 {
            canvas.draw_fast_vline(72 + i * 4, 30, if i % 2 == 0 { 4 } else { 2 }, Ink::Set);
        }
        canvas.draw_fast_hline(72, 34, 29, Ink::Set);

        // Spinner
        let angle = (self.frame % 120) as f32 / 120.0 * std::f32::consts::TAU;
        let (cx, cy) = (112, 46);
        let ex = cx + (angle.cos() * SPINNER_RADIUS).round() as i32;
        let ey = cy + (angle.sin() * SPINNER_RADIUS).round() as i32;
        canvas.draw_line(cx, cy, ex, ey, Ink::Set);
        canvas.set_pixel(cx, cy, Ink::Invert);

        // Sweep bar inverting whatever is under it
        let sweep = 72 + (t % 24);
        canvas.fill_rect(sweep, 38, 6, 22, Ink::Invert);

        if self.inverted {
            canvas.fill(Ink::Invert);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_always_drawn() {
        let mut scene = ShapesScene::new();
        for frame in [0, 37, 119] {
            scene.update(frame, Buttons::NONE);
            let mut canvas = Canvas::new();
            scene.render(&mut canvas);
            assert!(canvas.get_pixel(0, 0).is_on());
            assert!(canvas.get_pixel(127, 63).is_on());
        }
    }

    #[test]
    fn test_a_inverts_screen() {
        let mut scene = ShapesScene::new();
        let mut plain = Canvas::new();
        let mut inverted = Canvas::new();

        scene.update(5, Buttons::NONE);
        scene.render(&mut plain);
        scene.update(5, Buttons::A);
        scene.render(&mut inverted);

        let total = (monoframe_core::WIDTH * monoframe_core::HEIGHT) as u32;
        assert_eq!(
            plain.framebuffer().count_on() + inverted.framebuffer().count_on(),
            total
        );
    }
}
