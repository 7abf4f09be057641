//! The canonical RGBA pixel-buffer type.
//!
//! # Memory Layout
//!
//! A [`PixelBuffer`] stores `width * height * 4` bytes in row-major order,
//! top-to-bottom, with interleaved channels:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  ← Row 0
//!         [R G B A R G B A ...]  ← Row 1
//!         ...
//! ```
//!
//! # Access Contract
//!
//! Per-pixel access is bounds-absorbing by design: [`PixelBuffer::get`]
//! returns `[0, 0, 0, 0]` outside the image and [`PixelBuffer::set`] is a
//! no-op there, so inner sampling loops never branch on failure at the
//! edges. [`PixelBuffer::get_clamped`] replicates edge pixels instead, which
//! is the boundary policy used by convolution.
//!
//! Whole-buffer dimension mismatches, in contrast, are loud:
//! [`PixelBuffer::from_raw`] and [`PixelBuffer::copy_from`] return
//! [`Error`](crate::Error) values rather than silently truncating.
//!
//! # Usage
//!
//! ```
//! use rasterlab_core::PixelBuffer;
//!
//! let mut buf = PixelBuffer::new(64, 64);
//! buf.set(10, 10, [255, 128, 0, 255]);
//! assert_eq!(buf.get(10, 10), [255, 128, 0, 255]);
//!
//! // Out of bounds: absorbed, not raised.
//! assert_eq!(buf.get(1000, 1000), [0, 0, 0, 0]);
//! ```

use crate::pixel::{luminance_rec601, saturate};
use crate::{Error, Result};

/// Number of interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Owned row-major RGBA byte buffer with bounds-absorbing pixel access.
///
/// Every engine transform takes a `&PixelBuffer` and returns a freshly
/// allocated `PixelBuffer`; inputs are never mutated. `Clone` performs a deep
/// copy, matching the value semantics of the buffer contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Creates a buffer of the given size with every byte zeroed
    /// (transparent black).
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * CHANNELS;
        Self {
            data: vec![0; len],
            width,
            height,
        }
    }

    /// Creates a buffer filled with a constant pixel value.
    ///
    /// # Example
    ///
    /// ```
    /// use rasterlab_core::PixelBuffer;
    ///
    /// let buf = PixelBuffer::filled(4, 4, [10, 20, 30, 255]);
    /// assert_eq!(buf.get(3, 3), [10, 20, 30, 255]);
    /// ```
    pub fn filled(width: u32, height: u32, pixel: [u8; CHANNELS]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Wraps existing raw bytes as a buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] when `data.len()` is not exactly
    /// `width * height * 4`. A length mismatch always indicates a caller bug
    /// and is never absorbed.
    ///
    /// # Example
    ///
    /// ```
    /// use rasterlab_core::PixelBuffer;
    ///
    /// let buf = PixelBuffer::from_raw(2, 2, vec![0; 16]).unwrap();
    /// assert_eq!(buf.len(), 16);
    ///
    /// assert!(PixelBuffer::from_raw(2, 2, vec![0; 12]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} bytes, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the buffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the buffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total byte length (`width * height * 4`).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the raw bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the raw bytes mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer and returns the raw bytes.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of pixel (x, y). Caller guarantees in-bounds coordinates.
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Returns the pixel at (x, y), or `[0, 0, 0, 0]` out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; CHANNELS] {
        if x >= self.width || y >= self.height {
            return [0; CHANNELS];
        }
        let off = self.offset(x, y);
        [
            self.data[off],
            self.data[off + 1],
            self.data[off + 2],
            self.data[off + 3],
        ]
    }

    /// Returns the pixel at the coordinate clamped into the image
    /// (edge replication).
    ///
    /// This is the boundary policy used by spatial convolution: samples past
    /// an edge repeat the nearest edge pixel instead of contributing zero.
    /// Returns `[0, 0, 0, 0]` only when the buffer itself is empty.
    #[inline]
    pub fn get_clamped(&self, x: i32, y: i32) -> [u8; CHANNELS] {
        if self.is_empty() {
            return [0; CHANNELS];
        }
        let cx = x.clamp(0, self.width as i32 - 1) as u32;
        let cy = y.clamp(0, self.height as i32 - 1) as u32;
        self.get(cx, cy)
    }

    /// Sets the pixel at (x, y). Out-of-bounds writes are silently dropped.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, pixel: [u8; CHANNELS]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let off = self.offset(x, y);
        self.data[off..off + CHANNELS].copy_from_slice(&pixel);
    }

    /// Sets the RGB channels at (x, y) with full (255) alpha.
    #[inline]
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        self.set(x, y, [r, g, b, 255]);
    }

    /// Zeroes every byte in the buffer.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Copies all pixels from another buffer of the same dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] when the sizes differ; no bytes
    /// are copied in that case.
    pub fn copy_from(&mut self, other: &PixelBuffer) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(
                self.dimensions(),
                other.dimensions(),
            ));
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Returns a row of pixels as a byte slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize * CHANNELS;
        &self.data[start..start + self.width as usize * CHANNELS]
    }

    /// Returns a mutable row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize * CHANNELS;
        let end = start + self.width as usize * CHANNELS;
        &mut self.data[start..end]
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, [u8; CHANNELS])> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y, self.get(x, y))))
    }

    /// Produces a new buffer with every pixel reduced to its Rec.601
    /// luminance, replicated into R, G and B. Alpha is preserved.
    ///
    /// Idempotent: graying an already-gray buffer leaves it unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use rasterlab_core::PixelBuffer;
    ///
    /// let buf = PixelBuffer::filled(2, 2, [255, 0, 0, 200]);
    /// let gray = buf.to_grayscale();
    /// assert_eq!(gray.get(0, 0), [76, 76, 76, 200]);
    /// ```
    pub fn to_grayscale(&self) -> PixelBuffer {
        let mut out = PixelBuffer::new(self.width, self.height);
        for (src, dst) in self
            .data
            .chunks_exact(CHANNELS)
            .zip(out.data.chunks_exact_mut(CHANNELS))
        {
            let luma = saturate(luminance_rec601([
                src[0] as f32,
                src[1] as f32,
                src[2] as f32,
            ]));
            dst[0] = luma;
            dst[1] = luma;
            dst[2] = luma;
            dst[3] = src[3];
        }
        out
    }
}
