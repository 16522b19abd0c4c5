//! Host implementation of the console platform.

use std::time::{Duration, Instant};

use monoframe_core::{Buttons, Platform, Result};

use crate::sinks::FrameSink;

/// Wall clock, thread sleep and a frame sink standing in for the device.
pub struct HostPlatform {
    start: Instant,
    idle_interval: Duration,
    sink: Box<dyn FrameSink>,
    held: Buttons,
    presented: u64,
}

impl HostPlatform {
    /// Creates a platform. `idle_ms` is how long one idle call sleeps.
    pub fn new(sink: Box<dyn FrameSink>, held: Buttons, idle_ms: u64) -> Self {
        Self {
            start: Instant::now(),
            idle_interval: Duration::from_millis(idle_ms.max(1)),
            sink,
            held,
            presented: 0,
        }
    }

    /// Frames handed to the sink so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Platform for HostPlatform {
    fn now_millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn idle(&mut self) {
        std::thread::sleep(self.idle_interval);
    }

    fn present(&mut self, buffer: &[u8]) -> Result<()> {
        self.sink.present(self.presented, buffer)?;
        self.presented += 1;
        Ok(())
    }

    fn button_state(&self) -> Buttons {
        self.held
    }
}
