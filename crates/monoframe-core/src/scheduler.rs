//! Frame pacing.
//!
//! The scheduler is queried once per main-loop iteration with the current
//! millisecond time. It answers either "render now" or "wait", and does the
//! bookkeeping for the frame that just finished on the query after it.

use tracing::{debug, trace, warn};

/// Default target frame rate.
pub const DEFAULT_FRAME_RATE: u8 = 60;

/// Default scheduler resolution: idle only when more than this many
/// milliseconds remain before the next window.
pub const DEFAULT_IDLE_THRESHOLD_MS: u64 = 1;

/// Result of a scheduling query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// A rendering window is open: clear, draw and present now.
    Proceed,
    /// Too early. `idle` says whether enough time remains to yield.
    Wait { remaining_ms: u64, idle: bool },
}

impl FrameDecision {
    /// Returns true for [`FrameDecision::Proceed`].
    pub fn should_render(&self) -> bool {
        matches!(self, FrameDecision::Proceed)
    }
}

/// Frame timing state machine.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    /// Target frames per second (1-255).
    frame_rate: u8,
    /// 1000 / frame_rate.
    each_frame_millis: u64,
    /// Completed frames.
    frame_count: u64,
    /// When the current (or last) frame actually started.
    last_frame_start: u64,
    /// Earliest time the next window may open.
    next_frame_start: u64,
    /// Duration of the most recently completed frame.
    last_frame_duration_ms: u64,
    /// A frame was started and its completion is not yet accounted.
    post_render_pending: bool,
    /// Remaining time above which a wait yields.
    idle_threshold_ms: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

impl FrameScheduler {
    /// Creates a scheduler targeting `frame_rate` frames per second.
    pub fn new(frame_rate: u8) -> Self {
        let mut scheduler = Self {
            frame_rate: DEFAULT_FRAME_RATE,
            each_frame_millis: 1000 / DEFAULT_FRAME_RATE as u64,
            frame_count: 0,
            last_frame_start: 0,
            next_frame_start: 0,
            last_frame_duration_ms: 0,
            post_render_pending: false,
            idle_threshold_ms: DEFAULT_IDLE_THRESHOLD_MS,
        };
        scheduler.set_frame_rate(frame_rate);
        scheduler
    }

    /// Sets the idle threshold (scheduler resolution) in milliseconds.
    pub fn with_idle_threshold(mut self, threshold_ms: u64) -> Self {
        self.idle_threshold_ms = threshold_ms;
        self
    }

    /// Changes the target rate. Takes effect from the next window; a window
    /// already scheduled is left alone. A rate of 0 is treated as 1.
    pub fn set_frame_rate(&mut self, rate: u8) {
        let rate = if rate == 0 {
            warn!("Frame rate 0 requested, clamping to 1");
            1
        } else {
            rate
        };
        self.frame_rate = rate;
        self.each_frame_millis = 1000 / rate as u64;
        debug!(
            "Frame rate set to {} fps ({} ms per frame)",
            rate, self.each_frame_millis
        );
    }

    /// Target frames per second.
    pub fn frame_rate(&self) -> u8 {
        self.frame_rate
    }

    /// Milliseconds budgeted per frame.
    pub fn each_frame_millis(&self) -> u64 {
        self.each_frame_millis
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// How long the last completed frame took.
    pub fn last_frame_duration_ms(&self) -> u64 {
        self.last_frame_duration_ms
    }

    /// Earliest time the next window opens.
    pub fn next_frame_start(&self) -> u64 {
        self.next_frame_start
    }

    /// Remaining time above which a wait idles.
    pub fn idle_threshold_ms(&self) -> u64 {
        self.idle_threshold_ms
    }

    /// Decides whether a new frame may start at time `now`.
    ///
    /// The previous frame is accounted first. When a window opens, the next
    /// one is scheduled a full frame after `now`, so windows are never closer
    /// than `each_frame_millis` and slow frames are not made up for by
    /// running fast afterwards.
    pub fn poll(&mut self, now: u64) -> FrameDecision {
        if self.post_render_pending {
            self.last_frame_duration_ms = now.saturating_sub(self.last_frame_start);
            self.frame_count += 1;
            self.post_render_pending = false;
        }

        if now < self.next_frame_start {
            let remaining_ms = self.next_frame_start - now;
            return FrameDecision::Wait {
                remaining_ms,
                idle: remaining_ms > self.idle_threshold_ms,
            };
        }

        let late_ms = now - self.next_frame_start;
        if self.frame_count > 0 && late_ms >= self.each_frame_millis {
            trace!("Frame started {} ms late", late_ms);
        }
        self.next_frame_start = now + self.each_frame_millis;
        self.last_frame_start = now;
        self.post_render_pending = true;
        FrameDecision::Proceed
    }

    /// Percentage of the frame budget the last frame used. Over 100 means
    /// the frame overran.
    pub fn cpu_load(&self) -> u64 {
        self.last_frame_duration_ms * 100 / self.each_frame_millis.max(1)
    }

    /// Returns true on every `frames`-th frame. Always false for 0.
    pub fn every_x_frames(&self, frames: u8) -> bool {
        frames != 0 && self.frame_count % frames as u64 == 0
    }
}
