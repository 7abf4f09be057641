//! Frequency-domain analysis: 2D discrete Fourier transform, spectrum
//! visualization and frequency masking.
//!
//! # Pipeline
//!
//! [`forward_transform`] reduces the buffer to a luminance plane and applies
//! a separable 2D DFT: a 1D pass along rows, then along columns of the
//! row-transformed field. The pass evaluates the discrete sum
//! `Σ value[p] · e^(−i·2π·f·p/N)` over sampled positions. Positions are
//! sampled every [`TransformOptions::stride`] steps — a deliberate
//! speed/accuracy trade for multi-megapixel buffers (the default is
//! [`DEFAULT_SAMPLE_STRIDE`]). At stride 1 the sum is the exact DFT and the
//! pass runs through [`rustfft`] instead of the direct evaluation; the two
//! paths agree to float precision.
//!
//! [`inverse_transform`] does *not* reconstruct the spatial image: it renders
//! the field's log-compressed magnitude as a centered grayscale spectrum.
//! The masking filters ([`low_pass`], [`high_pass`], [`band_pass`]) therefore
//! produce visualizations of the surviving spectrum, not filtered photos.
//!
//! # Example
//!
//! ```
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::frequency::{FilterKind, filter, forward_transform};
//!
//! let buf = PixelBuffer::filled(16, 16, [128, 128, 128, 255]);
//!
//! let field = forward_transform(&buf);
//! assert_eq!(field.bins().len(), 2 * 16 * 16);
//!
//! // Unknown selector tags degrade to a pass-through copy.
//! let out = filter(&buf, FilterKind::from("bogus"));
//! assert_eq!(out, buf);
//! ```

use rasterlab_core::{CHANNELS, PixelBuffer, luminance_rec601, saturate};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::TAU;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Default position-sampling stride of the forward transform.
///
/// Every second spatial position contributes to the DFT sum; halving the
/// work per bin. Stride 1 selects the exact (FFT) path.
pub const DEFAULT_SAMPLE_STRIDE: usize = 2;

/// Tuning options for [`forward_transform_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Position-sampling stride of the DFT sum; values below 1 are treated
    /// as 1 (exact transform).
    pub stride: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            stride: DEFAULT_SAMPLE_STRIDE,
        }
    }
}

/// A 2D field of complex frequency bins.
///
/// Stores `width * height` complex values as interleaved `[re, im]` pairs in
/// the same row-major order as the source buffer, one bin per spatial pixel.
/// The zero-frequency (DC) bin sits at index 0; centering happens only at
/// visualization time.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyField {
    bins: Vec<f32>,
    width: u32,
    height: u32,
}

impl FrequencyField {
    /// Creates a zeroed field.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bins: vec![0.0; 2 * width as usize * height as usize],
            width,
            height,
        }
    }

    fn from_complex(width: u32, height: u32, data: Vec<Complex<f32>>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        let mut bins = Vec::with_capacity(2 * data.len());
        for c in data {
            bins.push(c.re);
            bins.push(c.im);
        }
        Self {
            bins,
            width,
            height,
        }
    }

    /// Returns the field width in bins.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the field height in bins.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the number of complex bins (`width * height`).
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the raw interleaved `[re, im]` storage
    /// (`2 * width * height` floats).
    #[inline]
    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Returns the real part of bin `i`.
    #[inline]
    pub fn re(&self, i: usize) -> f32 {
        self.bins[2 * i]
    }

    /// Returns the imaginary part of bin `i`.
    #[inline]
    pub fn im(&self, i: usize) -> f32 {
        self.bins[2 * i + 1]
    }

    /// Overwrites bin `i`.
    #[inline]
    pub fn set(&mut self, i: usize, re: f32, im: f32) {
        self.bins[2 * i] = re;
        self.bins[2 * i + 1] = im;
    }

    /// Returns the magnitude `sqrt(re² + im²)` of bin `i`.
    #[inline]
    pub fn magnitude(&self, i: usize) -> f32 {
        let re = self.re(i);
        let im = self.im(i);
        (re * re + im * im).sqrt()
    }

    /// Returns all bin magnitudes, row-major, uncompressed and uncentered.
    pub fn magnitudes(&self) -> Vec<f32> {
        (0..self.bin_count()).map(|i| self.magnitude(i)).collect()
    }
}

/// Computes the forward transform with default options.
///
/// See [`forward_transform_with`].
pub fn forward_transform(src: &PixelBuffer) -> FrequencyField {
    forward_transform_with(src, &TransformOptions::default())
}

/// Computes the separable 2D DFT of the buffer's luminance plane.
///
/// Never fails: an empty buffer yields an empty field, and every sampled
/// position is in range by construction.
pub fn forward_transform_with(src: &PixelBuffer, options: &TransformOptions) -> FrequencyField {
    let (width, height) = src.dimensions();
    let stride = options.stride.max(1);
    trace!(width, height, stride, "forward_transform");
    if src.is_empty() {
        return FrequencyField::new(width, height);
    }

    let w = width as usize;
    let h = height as usize;

    let lum: Vec<Complex<f32>> = src
        .data()
        .chunks_exact(CHANNELS)
        .map(|px| {
            Complex::new(
                luminance_rec601([px[0] as f32, px[1] as f32, px[2] as f32]),
                0.0,
            )
        })
        .collect();

    // Row pass, then column pass over the row-transformed field. The column
    // pass reuses the row machinery through a transpose on each side.
    let rows = transform_pass(&lum, w, stride);
    let t = transpose(&rows, w, h);
    let cols = transform_pass(&t, h, stride);
    let full = transpose(&cols, h, w);

    FrequencyField::from_complex(width, height, full)
}

/// Applies a 1D transform along each row of `input` (row length `width`).
fn transform_pass(input: &[Complex<f32>], width: usize, stride: usize) -> Vec<Complex<f32>> {
    if stride == 1 {
        fft_pass(input, width)
    } else {
        dft_pass(input, width, stride)
    }
}

/// Exact per-row DFT via rustfft.
fn fft_pass(input: &[Complex<f32>], width: usize) -> Vec<Complex<f32>> {
    let mut out = input.to_vec();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(width);

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(width).for_each(|row| fft.process(row));

    #[cfg(not(feature = "parallel"))]
    for row in out.chunks_mut(width) {
        fft.process(row);
    }

    out
}

/// Direct per-row DFT sum over positions sampled every `stride` steps.
fn dft_pass(input: &[Complex<f32>], width: usize, stride: usize) -> Vec<Complex<f32>> {
    let mut out = vec![Complex::new(0.0, 0.0); input.len()];

    let row_dft = |(y, row_out): (usize, &mut [Complex<f32>])| {
        let row_in = &input[y * width..(y + 1) * width];
        for (f, bin) in row_out.iter_mut().enumerate() {
            let mut sum = Complex::new(0.0f32, 0.0);
            for p in (0..width).step_by(stride) {
                // f*p reduced mod width keeps the angle argument small and
                // exact in f32.
                let k = (f * p) % width;
                let angle = -TAU * k as f32 / width as f32;
                sum += row_in[p] * Complex::from_polar(1.0, angle);
            }
            *bin = sum;
        }
    };

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(width).enumerate().for_each(row_dft);

    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(width).enumerate().for_each(row_dft);

    out
}

/// Transposes a `width x height` field into `height x width`.
fn transpose(input: &[Complex<f32>], width: usize, height: usize) -> Vec<Complex<f32>> {
    let mut out = vec![Complex::new(0.0f32, 0.0); input.len()];

    let copy_col = |(x, col): (usize, &mut [Complex<f32>])| {
        for (y, slot) in col.iter_mut().enumerate() {
            *slot = input[y * width + x];
        }
    };

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(height).enumerate().for_each(copy_col);

    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(height).enumerate().for_each(copy_col);

    out
}

/// Renders a frequency field as a centered grayscale spectrum.
///
/// Per bin: magnitude, `ln(1 + m)` compression, normalization by the
/// observed maximum to [0, 255], then a quadrant swap that re-centers the
/// DC bin to the middle of the buffer. Output is grayscale with full alpha.
/// An all-zero field renders black.
pub fn inverse_transform(field: &FrequencyField) -> PixelBuffer {
    let (width, height) = (field.width(), field.height());
    trace!(width, height, "inverse_transform");
    let mut out = PixelBuffer::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let w = width as usize;
    let h = height as usize;

    let compressed: Vec<f32> = (0..field.bin_count())
        .map(|i| (1.0 + field.magnitude(i)).ln())
        .collect();
    let max = compressed.iter().fold(0.0f32, |acc, &v| acc.max(v));
    let scale = if max > 0.0 { 255.0 / max } else { 0.0 };

    let shift_x = w / 2;
    let shift_y = h / 2;
    let row_len = w * CHANNELS;

    let render_row = |(y, row): (usize, &mut [u8])| {
        let sy = (y + shift_y) % h;
        for x in 0..w {
            let sx = (x + shift_x) % w;
            let v = saturate(compressed[sy * w + sx] * scale);
            let off = x * CHANNELS;
            row[off] = v;
            row[off + 1] = v;
            row[off + 2] = v;
            row[off + 3] = 255;
        }
    };

    #[cfg(feature = "parallel")]
    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(render_row);

    #[cfg(not(feature = "parallel"))]
    out.data_mut()
        .chunks_mut(row_len)
        .enumerate()
        .for_each(render_row);

    out
}

/// Returns the per-bin magnitudes of the buffer's forward transform.
///
/// No log compression, no centering; length `width * height`.
pub fn spectrum(src: &PixelBuffer) -> Vec<f32> {
    forward_transform(src).magnitudes()
}

/// Retention criterion over bin distance from the field center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrequencyMask {
    /// Keep bins with `dist <= cutoff`.
    LowPass(f32),
    /// Keep bins with `dist > cutoff`.
    HighPass(f32),
    /// Keep bins with `low <= dist <= high`.
    BandPass(f32, f32),
}

impl FrequencyMask {
    /// Returns `true` if a bin at the given center distance is retained.
    #[inline]
    pub fn retains(&self, dist: f32) -> bool {
        match *self {
            FrequencyMask::LowPass(cutoff) => dist <= cutoff,
            FrequencyMask::HighPass(cutoff) => dist > cutoff,
            FrequencyMask::BandPass(low, high) => dist >= low && dist <= high,
        }
    }
}

/// Zeroes every bin the mask does not retain.
///
/// Distance is the Euclidean distance of the bin index (x, y) from the
/// field center (width/2, height/2), in bin-index space.
pub fn apply_mask(field: &mut FrequencyField, mask: FrequencyMask) {
    let w = field.width() as usize;
    let h = field.height() as usize;
    let cx = (w / 2) as f32;
    let cy = (h / 2) as f32;

    for y in 0..h {
        let dy = y as f32 - cy;
        for x in 0..w {
            let dx = x as f32 - cx;
            let dist = (dx * dx + dy * dy).sqrt();
            if !mask.retains(dist) {
                field.set(y * w + x, 0.0, 0.0);
            }
        }
    }
}

/// Low-pass spectrum visualization: forward transform, keep bins within
/// `cutoff` of the field center, render the surviving magnitudes.
pub fn low_pass(src: &PixelBuffer, cutoff: f32) -> PixelBuffer {
    debug!(cutoff, "low_pass");
    let mut field = forward_transform(src);
    apply_mask(&mut field, FrequencyMask::LowPass(cutoff));
    inverse_transform(&field)
}

/// High-pass spectrum visualization: keeps bins beyond `cutoff`.
pub fn high_pass(src: &PixelBuffer, cutoff: f32) -> PixelBuffer {
    debug!(cutoff, "high_pass");
    let mut field = forward_transform(src);
    apply_mask(&mut field, FrequencyMask::HighPass(cutoff));
    inverse_transform(&field)
}

/// Band-pass spectrum visualization: keeps bins between `low` and `high`.
pub fn band_pass(src: &PixelBuffer, low: f32, high: f32) -> PixelBuffer {
    debug!(low, high, "band_pass");
    let mut field = forward_transform(src);
    apply_mask(&mut field, FrequencyMask::BandPass(low, high));
    inverse_transform(&field)
}

/// Default low/high-pass cutoff for a buffer: `min(width, height) / 4`.
pub fn default_cutoff(width: u32, height: u32) -> f32 {
    width.min(height) as f32 / 4.0
}

/// Default band-pass range for a buffer:
/// `[min(width, height) / 8, min(width, height) / 2]`.
pub fn default_band(width: u32, height: u32) -> (f32, f32) {
    let m = width.min(height) as f32;
    (m / 8.0, m / 2.0)
}

/// Frequency-filter selector.
///
/// Parsed from the stable tags `"lowpass"`, `"highpass"` and `"bandpass"`
/// (case-sensitive); anything else is [`FilterKind::Unknown`], which
/// [`filter`] maps to a pass-through copy rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Keep low frequencies.
    LowPass,
    /// Keep high frequencies.
    HighPass,
    /// Keep a frequency band.
    BandPass,
    /// Unrecognized tag; pass-through.
    Unknown,
}

impl From<&str> for FilterKind {
    fn from(tag: &str) -> Self {
        match tag {
            "lowpass" => FilterKind::LowPass,
            "highpass" => FilterKind::HighPass,
            "bandpass" => FilterKind::BandPass,
            _ => FilterKind::Unknown,
        }
    }
}

/// Runs the selected frequency filter with the default cutoffs.
///
/// [`FilterKind::Unknown`] returns a verbatim copy of the input.
pub fn filter(src: &PixelBuffer, kind: FilterKind) -> PixelBuffer {
    let (width, height) = src.dimensions();
    trace!(width, height, ?kind, "frequency filter");
    match kind {
        FilterKind::LowPass => low_pass(src, default_cutoff(width, height)),
        FilterKind::HighPass => high_pass(src, default_cutoff(width, height)),
        FilterKind::BandPass => {
            let (low, high) = default_band(width, height);
            band_pass(src, low, high)
        }
        FilterKind::Unknown => src.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn textured_buffer(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = (((x * 31 + y * 17) % 256) as u8).wrapping_mul(3);
                buf.set(x, y, [v, v / 2, 255 - v, 255]);
            }
        }
        buf
    }

    /// Naive full-resolution 2D DFT, for cross-checking the fast paths.
    fn reference_dft(src: &PixelBuffer) -> Vec<Complex<f32>> {
        let w = src.width() as usize;
        let h = src.height() as usize;
        let lum: Vec<f32> = src
            .data()
            .chunks_exact(CHANNELS)
            .map(|px| luminance_rec601([px[0] as f32, px[1] as f32, px[2] as f32]))
            .collect();

        let mut out = vec![Complex::new(0.0f32, 0.0); w * h];
        for fy in 0..h {
            for fx in 0..w {
                let mut sum = Complex::new(0.0f32, 0.0);
                for y in 0..h {
                    for x in 0..w {
                        let angle = -TAU
                            * ((fx * x) as f32 / w as f32 + (fy * y) as f32 / h as f32);
                        sum += Complex::from_polar(lum[y * w + x], angle);
                    }
                }
                out[fy * w + fx] = sum;
            }
        }
        out
    }

    #[test]
    fn test_field_dimensions() {
        let buf = textured_buffer(6, 4);
        let field = forward_transform(&buf);
        assert_eq!(field.bins().len(), 2 * 6 * 4);
        assert_eq!(field.bin_count(), 24);
        assert_eq!(spectrum(&buf).len(), 24);
    }

    #[test]
    fn test_dc_bin_constant_image_exact_path() {
        let buf = PixelBuffer::filled(8, 8, [100, 100, 100, 255]);
        let field = forward_transform_with(&buf, &TransformOptions { stride: 1 });
        // DC collects the full luminance sum; every other bin cancels.
        assert_relative_eq!(field.re(0), 64.0 * 100.0, epsilon = 0.5);
        assert_relative_eq!(field.im(0), 0.0, epsilon = 0.5);
        for i in 1..field.bin_count() {
            assert!(field.magnitude(i) < 1e-2, "bin {i} leaked");
        }
    }

    #[test]
    fn test_exact_path_matches_reference() {
        let buf = textured_buffer(5, 4);
        let field = forward_transform_with(&buf, &TransformOptions { stride: 1 });
        let reference = reference_dft(&buf);
        for (i, want) in reference.iter().enumerate() {
            assert_relative_eq!(field.re(i), want.re, epsilon = 0.5, max_relative = 1e-3);
            assert_relative_eq!(field.im(i), want.im, epsilon = 0.5, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_subsampled_dc_dominates() {
        let buf = PixelBuffer::filled(8, 8, [180, 180, 180, 255]);
        let field = forward_transform(&buf);
        let dc = field.magnitude(0);
        assert!(dc > 0.0);
        for i in 1..field.bin_count() {
            assert!(field.magnitude(i) <= dc + 1e-3);
        }
    }

    #[test]
    fn test_inverse_is_grayscale_opaque_and_centered() {
        let buf = PixelBuffer::filled(8, 8, [200, 50, 10, 255]);
        let out = inverse_transform(&forward_transform(&buf));
        assert_eq!(out.dimensions(), (8, 8));
        for (_, _, px) in out.pixels() {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 255);
        }
        // DC re-centered to the middle and normalized to full white.
        assert_eq!(out.get(4, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn test_inverse_all_zero_field() {
        let field = FrequencyField::new(4, 4);
        let out = inverse_transform(&field);
        for (_, _, px) in out.pixels() {
            assert_eq!(px, [0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_mask_retention_rules() {
        assert!(FrequencyMask::LowPass(4.0).retains(4.0));
        assert!(!FrequencyMask::LowPass(4.0).retains(4.1));
        assert!(!FrequencyMask::HighPass(4.0).retains(4.0));
        assert!(FrequencyMask::HighPass(4.0).retains(4.1));
        assert!(FrequencyMask::BandPass(2.0, 4.0).retains(2.0));
        assert!(FrequencyMask::BandPass(2.0, 4.0).retains(4.0));
        assert!(!FrequencyMask::BandPass(2.0, 4.0).retains(1.9));
        assert!(!FrequencyMask::BandPass(2.0, 4.0).retains(4.1));
    }

    #[test]
    fn test_band_pass_is_intersection() {
        // band(lo, hi) retains exactly ¬low(lo) ∧ low(hi).
        let band = FrequencyMask::BandPass(2.0, 5.0);
        let inner = FrequencyMask::LowPass(2.0);
        let outer = FrequencyMask::LowPass(5.0);
        for i in 0..200 {
            let dist = i as f32 * 0.05;
            // LowPass keeps dist <= cutoff, so the band's lower edge needs
            // the strict complement shifted by the boundary itself.
            let expect = (!inner.retains(dist) || dist == 2.0) && outer.retains(dist);
            assert_eq!(band.retains(dist), expect, "dist {dist}");
        }
    }

    #[test]
    fn test_apply_mask_zeroes_rejected_bins() {
        let buf = textured_buffer(8, 8);
        let mut field = forward_transform(&buf);
        apply_mask(&mut field, FrequencyMask::LowPass(2.0));
        let w = 8usize;
        for y in 0..8usize {
            for x in 0..8usize {
                let dist = (((x as f32 - 4.0).powi(2)) + ((y as f32 - 4.0).powi(2))).sqrt();
                if dist > 2.0 {
                    assert_eq!(field.magnitude(y * w + x), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_filter_kind_parse() {
        assert_eq!(FilterKind::from("lowpass"), FilterKind::LowPass);
        assert_eq!(FilterKind::from("highpass"), FilterKind::HighPass);
        assert_eq!(FilterKind::from("bandpass"), FilterKind::BandPass);
        assert_eq!(FilterKind::from("bogus"), FilterKind::Unknown);
        // Tags are case-sensitive.
        assert_eq!(FilterKind::from("LowPass"), FilterKind::Unknown);
    }

    #[test]
    fn test_unknown_filter_passes_through() {
        let buf = textured_buffer(8, 8);
        let out = filter(&buf, FilterKind::Unknown);
        assert_eq!(out, buf);
    }

    #[test]
    fn test_filters_preserve_dimensions() {
        let buf = textured_buffer(10, 6);
        for kind in [FilterKind::LowPass, FilterKind::HighPass, FilterKind::BandPass] {
            let out = filter(&buf, kind);
            assert_eq!(out.dimensions(), (10, 6));
            assert_eq!(out.len(), 10 * 6 * 4);
        }
    }

    #[test]
    fn test_empty_buffer() {
        let buf = PixelBuffer::new(0, 0);
        let field = forward_transform(&buf);
        assert_eq!(field.bin_count(), 0);
        let out = inverse_transform(&field);
        assert!(out.is_empty());
    }
}
