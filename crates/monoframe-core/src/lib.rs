//! Monoframe Core Library
//!
//! Software rendering core for monochrome handheld game displays: a packed
//! 1-bit-per-pixel framebuffer, a rasterizer for shapes, bitmaps and glyph
//! text, and a frame scheduler that paces rendering to a target rate.

pub mod bitmap;
pub mod canvas;
pub mod console;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod platform;
pub mod scheduler;
pub mod text;

pub use bitmap::{Bitmap, XyBitmap};
pub use canvas::Canvas;
pub use console::Console;
pub use error::{Error, Result};
pub use font::Font;
pub use framebuffer::{Framebuffer, Ink, Pixel};
pub use platform::{Buttons, Platform};
pub use scheduler::{FrameDecision, FrameScheduler};
pub use text::TextCursor;

/// Display width in pixels.
pub const WIDTH: usize = 128;
/// Display height in pixels.
pub const HEIGHT: usize = 64;

/// Number of 8-pixel row-bands.
pub const BANDS: usize = HEIGHT / 8;
/// Size of the packed framebuffer in bytes.
pub const BUFFER_LEN: usize = WIDTH * BANDS;
