//! Bouncing sprite, steerable with the d-pad.

use monoframe_core::{Bitmap, Buttons, Canvas, Ink, Result, XyBitmap, HEIGHT, WIDTH};

use super::Scene;

/// 8x8 ball, packed layout.
const BALL: [u8; 8] = [0x3C, 0x7E, 0xE7, 0xC3, 0xC3, 0xE7, 0x7E, 0x3C];
const BALL_SIZE: i32 = 8;

/// 12x5 "hit" badge, row-major MSB first.
const BADGE: [u8; 10] = [
    0b1010_1110, 0b1110_0000, // row 0
    0b1010_0100, 0b0100_0000, // row 1
    0b1110_0100, 0b0100_0000, // row 2
    0b1010_0100, 0b0100_0000, // row 3
    0b1010_1110, 0b0100_0000, // row 4
];

/// Frames the badge stays up after a wall hit.
const BADGE_FRAMES: u32 = 20;

/// A ball bouncing off the screen edges.
pub struct BounceScene {
    ball: Bitmap<'static>,
    badge: XyBitmap<'static>,
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    frozen: bool,
    badge_left: u32,
}

impl BounceScene {
    /// Creates a new bounce scene.
    pub fn new() -> Result<Self> {
        Ok(Self {
            ball: Bitmap::new(&BALL, BALL_SIZE as u16, BALL_SIZE as u16)?,
            badge: XyBitmap::new(&BADGE, 12, 5)?,
            x: 10,
            y: 5,
            dx: 2,
            dy: 1,
            frozen: false,
            badge_left: 0,
        })
    }

    fn steer(&mut self, buttons: Buttons) {
        if buttons.contains(Buttons::LEFT) {
            self.dx = -self.dx.abs();
        }
        if buttons.contains(Buttons::RIGHT) {
            self.dx = self.dx.abs();
        }
        if buttons.contains(Buttons::UP) {
            self.dy = -self.dy.abs();
        }
        if buttons.contains(Buttons::DOWN) {
            self.dy = self.dy.abs();
        }
    }
}

impl Scene for BounceScene {
    fn name(&self) -> &str {
        "bounce"
    }

    fn update(&mut self, _frame: u64, buttons: Buttons) {
        self.frozen = buttons.contains(Buttons::B);
        self.badge_left = self.badge_left.saturating_sub(1);
        if self.frozen {
            return;
        }
        self.steer(buttons);

        let max_x = WIDTH as i32 - BALL_SIZE;
        let max_y = HEIGHT as i32 - BALL_SIZE;
        self.x += self.dx;
        self.y += self.dy;

        let mut hit = false;
        if self.x <= 0 || self.x >= max_x {
            self.x = self.x.clamp(0, max_x);
            self.dx = -self.dx;
            hit = true;
        }
        if self.y <= 0 || self.y >= max_y {
            self.y = self.y.clamp(0, max_y);
            self.dy = -self.dy;
            hit = true;
        }
        if hit {
            self.badge_left = BADGE_FRAMES;
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        // Floor and ceiling shading, every other row
        for y in [0, 2, 61, 63] {
            canvas.draw_fast_hline(0, y, WIDTH as i32, Ink::Set);
        }

        // Shadow trails one frame behind
        canvas.draw_bitmap(self.x - self.dx, self.y - self.dy, &self.ball, Ink::Invert);
        canvas.draw_bitmap(self.x, self.y, &self.ball, Ink::Set);

        if self.badge_left > 0 {
            canvas.draw_slow_xy_bitmap(self.x - 2, self.y - 7, &self.badge, Ink::Invert);
        }
        if self.frozen {
            canvas.draw_rect(self.x - 2, self.y - 2, BALL_SIZE + 4, BALL_SIZE + 4, Ink::Set);
        }
    }
}
