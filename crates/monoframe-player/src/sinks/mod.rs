//! Frame sinks: where presented framebuffers end up on the host.

mod snapshot;
mod terminal;

pub use snapshot::PngSink;
pub use terminal::TerminalSink;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{OutputConfig, OutputKind};

/// Receives every presented frame.
pub trait FrameSink: Send {
    /// Returns the name of the sink.
    fn name(&self) -> &str;

    /// Takes one packed framebuffer. `frame` counts presented frames from 0.
    fn present(&mut self, frame: u64, buffer: &[u8]) -> monoframe_core::Result<()>;
}

/// Discards frames.
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn name(&self) -> &str {
        "none"
    }

    fn present(&mut self, _frame: u64, _buffer: &[u8]) -> monoframe_core::Result<()> {
        Ok(())
    }
}

/// Creates the sink selected by the output configuration.
pub fn create_sink(config: &OutputConfig) -> Result<Box<dyn FrameSink>> {
    let sink: Box<dyn FrameSink> = match config.kind {
        OutputKind::Terminal => Box::new(TerminalSink::new(std::io::stdout())),
        OutputKind::Png => Box::new(
            PngSink::new(&config.dir, config.scale, config.every)
                .with_context(|| format!("Failed to prepare {}", config.dir.display()))?,
        ),
        OutputKind::Null => Box::new(NullSink),
    };
    info!("Output: {}", sink.name());
    Ok(sink)
}
