//! Error types for the monoframe core library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of drawing.
///
/// Drawing itself never fails: out-of-range geometry is clipped.
#[derive(Error, Debug)]
pub enum Error {
    /// Bitmap data shorter than its declared dimensions require.
    #[error("Bitmap size mismatch: expected at least {expected} bytes, got {actual}")]
    BitmapSize { expected: usize, actual: usize },

    /// Frame rate outside 1-255.
    #[error("Invalid frame rate: {0} (must be 1-255)")]
    InvalidFrameRate(u32),

    /// The display sink failed to take the frame.
    #[error("Display error: {0}")]
    Display(String),

    /// I/O error while presenting a frame.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
