//! Bitmap views for blitting.
//!
//! Two source layouts are supported:
//!
//! - [`Bitmap`]: the native packed layout. Row-major bytes, each byte holds
//!   8 vertically stacked pixels with bit 0 as the topmost pixel of its band.
//!   This is the asset format the rest of the tooling produces.
//! - [`XyBitmap`]: plain row-major 1bpp, `(width + 7) / 8` bytes per row,
//!   most significant bit first.

use crate::{Error, Result};

/// A packed bitmap in framebuffer layout.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
}

impl<'a> Bitmap<'a> {
    /// Wraps packed bitmap data.
    ///
    /// Fails if `data` holds fewer than `width * ceil(height / 8)` bytes.
    pub fn new(data: &'a [u8], width: u16, height: u16) -> Result<Self> {
        let expected = Self::packed_len(width, height);
        if data.len() < expected {
            return Err(Error::BitmapSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Number of bytes a packed bitmap of the given size occupies.
    pub fn packed_len(width: u16, height: u16) -> usize {
        width as usize * Self::bands_for(height)
    }

    fn bands_for(height: u16) -> usize {
        (height as usize).div_ceil(8)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of 8-pixel bands in the bitmap.
    pub fn bands(&self) -> usize {
        Self::bands_for(self.height)
    }

    /// Returns the byte for column `col` of band `band`.
    #[inline]
    pub(crate) fn byte(&self, band: usize, col: usize) -> u8 {
        self.data
            .get(band * self.width as usize + col)
            .copied()
            .unwrap_or(0)
    }
}

/// A row-major, MSB-first bitmap.
#[derive(Debug, Clone, Copy)]
pub struct XyBitmap<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
}

impl<'a> XyBitmap<'a> {
    /// Wraps row-major bitmap data.
    ///
    /// Fails if `data` holds fewer than `ceil(width / 8) * height` bytes.
    pub fn new(data: &'a [u8], width: u16, height: u16) -> Result<Self> {
        let expected = Self::stride_for(width) * height as usize;
        if data.len() < expected {
            return Err(Error::BitmapSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    fn stride_for(width: u16) -> usize {
        (width as usize).div_ceil(8)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns true if the source pixel at (x, y) is set.
    #[inline]
    pub fn is_set(&self, x: u16, y: u16) -> bool {
        let index = y as usize * Self::stride_for(self.width) + x as usize / 8;
        self.data
            .get(index)
            .is_some_and(|b| b & (0x80 >> (x & 7)) != 0)
    }
}
