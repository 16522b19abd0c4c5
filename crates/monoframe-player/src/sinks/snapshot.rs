//! PNG snapshot output.

use std::path::{Path, PathBuf};

use monoframe_core::framebuffer::unpack_luma8;
use monoframe_core::{Error, Result, HEIGHT, WIDTH};
use tracing::debug;

use super::FrameSink;

/// Encodes a packed buffer as an 8-bit grayscale PNG, each pixel blown up
/// to a `scale` x `scale` square.
pub fn encode_png(buffer: &[u8], scale: u32) -> Result<Vec<u8>> {
    let scale = scale.max(1) as usize;
    let (width, height) = (WIDTH * scale, HEIGHT * scale);
    let luma = unpack_luma8(buffer);

    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = &luma[(y / scale) * WIDTH..][..WIDTH];
        for x in 0..width {
            pixels.push(row[x / scale]);
        }
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width as u32, height as u32);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| Error::Display(format!("PNG header: {}", e)))?;
        writer
            .write_image_data(&pixels)
            .map_err(|e| Error::Display(format!("PNG data: {}", e)))?;
    }

    Ok(png_data)
}

/// Writes `frame-NNNNNN.png` files into a directory.
pub struct PngSink {
    dir: PathBuf,
    scale: u32,
    every: u64,
}

impl PngSink {
    /// Creates the output directory if needed.
    pub fn new(dir: &Path, scale: u32, every: u64) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            scale,
            every: every.max(1),
        })
    }

    fn path_for(&self, frame: u64) -> PathBuf {
        self.dir.join(format!("frame-{:06}.png", frame))
    }
}

impl FrameSink for PngSink {
    fn name(&self) -> &str {
        "png"
    }

    fn present(&mut self, frame: u64, buffer: &[u8]) -> Result<()> {
        if frame % self.every != 0 {
            return Ok(());
        }
        let path = self.path_for(frame);
        std::fs::write(&path, encode_png(buffer, self.scale)?)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
