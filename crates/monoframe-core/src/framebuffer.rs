//! Packed 1bpp framebuffer.
//!
//! Pixels are stored one byte per 8 vertically stacked pixels, row-major in
//! 8-pixel bands: pixel (x, y) lives in byte `(y / 8) * WIDTH + x`, bit `y % 8`.
//! This is the layout the display controller scans out and the layout packed
//! bitmaps use.

use crate::{BUFFER_LEN, HEIGHT, WIDTH};

/// Stored state of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pixel {
    #[default]
    Off,
    On,
}

impl Pixel {
    /// Returns true if the pixel is lit.
    pub fn is_on(self) -> bool {
        self == Pixel::On
    }
}

impl From<bool> for Pixel {
    fn from(on: bool) -> Self {
        if on {
            Pixel::On
        } else {
            Pixel::Off
        }
    }
}

/// How a drawing operation combines with what is already in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ink {
    /// Turn pixels on (OR).
    #[default]
    Set,
    /// Turn pixels off (AND with the complement).
    Clear,
    /// Flip pixels (XOR).
    Invert,
}

impl Ink {
    /// Combines `mask` into `byte` with this operator.
    #[inline]
    pub fn apply(self, byte: &mut u8, mask: u8) {
        match self {
            Ink::Set => *byte |= mask,
            Ink::Clear => *byte &= !mask,
            Ink::Invert => *byte ^= mask,
        }
    }
}

impl From<Pixel> for Ink {
    fn from(pixel: Pixel) -> Self {
        match pixel {
            Pixel::On => Ink::Set,
            Pixel::Off => Ink::Clear,
        }
    }
}

/// The display framebuffer.
///
/// Not `Clone`: a canvas owns the only instance it draws into.
pub struct Framebuffer {
    data: [u8; BUFFER_LEN],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Creates a new framebuffer with every pixel off.
    pub fn new() -> Self {
        Self {
            data: [0; BUFFER_LEN],
        }
    }

    /// Returns the width of the framebuffer.
    pub const fn width(&self) -> usize {
        WIDTH
    }

    /// Returns the height of the framebuffer.
    pub const fn height(&self) -> usize {
        HEIGHT
    }

    /// Returns the packed pixel data, ready to hand to a display.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Sets every pixel off.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Applies `ink` to every pixel in one linear pass.
    pub fn fill(&mut self, ink: Ink) {
        match ink {
            Ink::Set => self.data.fill(0xFF),
            Ink::Clear => self.data.fill(0x00),
            Ink::Invert => self.data.iter_mut().for_each(|b| *b ^= 0xFF),
        }
    }

    /// Returns true if (x, y) is on screen.
    #[inline]
    pub fn contains(x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < WIDTH && (y as usize) < HEIGHT
    }

    /// Writes one pixel.
    ///
    /// With the `pixel-safe-mode` feature, off-screen coordinates are ignored.
    /// Without it the range check is skipped: a bad coordinate may alias some
    /// other pixel, but the byte index is still checked against the storage.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, ink: Ink) {
        if cfg!(feature = "pixel-safe-mode") && !Self::contains(x, y) {
            return;
        }

        let index = y.div_euclid(8) as i64 * WIDTH as i64 + x as i64;
        let mask = 1u8 << y.rem_euclid(8);
        self.apply_mask(index, mask, ink);
    }

    /// Reads one pixel. Off-screen coordinates read as off.
    pub fn get_pixel(&self, x: i32, y: i32) -> Pixel {
        if !Self::contains(x, y) {
            return Pixel::Off;
        }
        let byte = self.data[(y as usize / 8) * WIDTH + x as usize];
        Pixel::from(byte & (1 << (y % 8)) != 0)
    }

    /// Combines `mask` into the byte at `index`. Indices outside the storage
    /// are dropped.
    #[inline]
    pub(crate) fn apply_mask(&mut self, index: i64, mask: u8, ink: Ink) {
        if let Some(byte) = usize::try_from(index)
            .ok()
            .and_then(|i| self.data.get_mut(i))
        {
            ink.apply(byte, mask);
        }
    }

    /// Returns one row-band, `WIDTH` bytes, or `None` past the last band.
    pub(crate) fn band_mut(&mut self, band: usize) -> Option<&mut [u8]> {
        let start = band.checked_mul(WIDTH)?;
        self.data.get_mut(start..start + WIDTH)
    }

    /// Returns the byte holding column `x` of row-band `band`.
    pub(crate) fn band_byte_mut(&mut self, band: usize, x: usize) -> Option<&mut u8> {
        if x >= WIDTH {
            return None;
        }
        self.band_mut(band)?.get_mut(x)
    }

    /// Counts lit pixels.
    pub fn count_on(&self) -> u32 {
        self.data.iter().map(|b| b.count_ones()).sum()
    }

    /// Expands the framebuffer to 8-bit grayscale, row-major, one byte per
    /// pixel (0x00 off, 0xFF on).
    pub fn to_luma8(&self) -> Vec<u8> {
        unpack_luma8(&self.data)
    }
}

/// Reads pixel (x, y) from a packed buffer as handed to a display.
/// Coordinates past the buffer read as off.
pub fn packed_pixel(buffer: &[u8], x: usize, y: usize) -> bool {
    if x >= WIDTH {
        return false;
    }
    buffer
        .get((y / 8) * WIDTH + x)
        .is_some_and(|byte| byte & (1 << (y % 8)) != 0)
}

/// Unpacks a packed buffer into row-major 8-bit grayscale.
pub fn unpack_luma8(buffer: &[u8]) -> Vec<u8> {
    let mut luma = Vec::with_capacity(WIDTH * HEIGHT);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            luma.push(if packed_pixel(buffer, x, y) { 0xFF } else { 0x00 });
        }
    }
    luma
}
