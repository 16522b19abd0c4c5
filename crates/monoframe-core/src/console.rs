//! Console: canvas, scheduler and platform wired into one frame loop.

use tracing::trace;

use crate::canvas::Canvas;
use crate::error::Result;
use crate::platform::{Buttons, Platform};
use crate::scheduler::{FrameDecision, FrameScheduler};

/// A frame-paced drawing surface bound to a platform.
///
/// Typical loop:
///
/// ```ignore
/// loop {
///     console.draw(|canvas| {
///         canvas.print("hello");
///     })?;
/// }
/// ```
pub struct Console<P: Platform> {
    canvas: Canvas,
    scheduler: FrameScheduler,
    platform: P,
}

impl<P: Platform> Console<P> {
    /// Creates a console running at the default frame rate.
    pub fn new(platform: P) -> Self {
        Self::with_scheduler(platform, FrameScheduler::default())
    }

    /// Creates a console with a preconfigured scheduler.
    pub fn with_scheduler(platform: P, scheduler: FrameScheduler) -> Self {
        Self {
            canvas: Canvas::new(),
            scheduler,
            platform,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut FrameScheduler {
        &mut self.scheduler
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Consumes the console and returns its platform.
    pub fn into_platform(self) -> P {
        self.platform
    }

    pub fn set_frame_rate(&mut self, rate: u8) {
        self.scheduler.set_frame_rate(rate);
    }

    /// Returns true when a new frame may be rendered. When it is too early
    /// and enough time remains, the platform is idled once before returning.
    pub fn new_frame(&mut self) -> bool {
        let now = self.platform.now_millis();
        match self.scheduler.poll(now) {
            FrameDecision::Proceed => true,
            FrameDecision::Wait { remaining_ms, idle } => {
                if idle {
                    trace!("Idling, {} ms until next frame", remaining_ms);
                    self.platform.idle();
                }
                false
            }
        }
    }

    /// Same as [`Console::new_frame`].
    pub fn next_frame(&mut self) -> bool {
        self.new_frame()
    }

    /// Hands the framebuffer to the platform's display.
    pub fn display(&mut self) -> Result<()> {
        self.platform.present(self.canvas.buffer())
    }

    /// Runs one loop iteration: if a frame window is open, clears the
    /// canvas, lets `f` draw, and presents the result.
    ///
    /// Returns whether a frame was rendered.
    pub fn draw<F>(&mut self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Canvas),
    {
        if !self.new_frame() {
            return Ok(false);
        }
        self.canvas.clear();
        f(&mut self.canvas);
        self.display()?;
        Ok(true)
    }

    /// Returns true if all of `buttons` are held.
    pub fn pressed(&self, buttons: Buttons) -> bool {
        self.platform.button_state().contains(buttons)
    }

    /// Returns true if none of `buttons` are held.
    pub fn not_pressed(&self, buttons: Buttons) -> bool {
        self.platform.button_state().is_disjoint(buttons)
    }

    pub fn every_x_frames(&self, frames: u8) -> bool {
        self.scheduler.every_x_frames(frames)
    }

    pub fn cpu_load(&self) -> u64 {
        self.scheduler.cpu_load()
    }

    pub fn frame_count(&self) -> u64 {
        self.scheduler.frame_count()
    }
}
