//! Gradient-magnitude blur/edge analysis.
//!
//! [`detect_blur`] composes two spatial-filter passes — the stock
//! `Horizontal Edge` and `Vertical Edge` kernels — into a single
//! gradient-magnitude heatmap: per pixel, the Euclidean magnitude of the two
//! directional responses, min–max normalized over the whole image and
//! rendered into the red channel only. Flat regions read as black, sharp
//! detail as bright red; a blurry image produces a dim map overall.
//!
//! # Example
//!
//! ```
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::edge::detect_blur;
//! use rasterlab_ops::kernel::KernelRegistry;
//!
//! let registry = KernelRegistry::stock();
//! let buf = PixelBuffer::filled(8, 8, [128, 128, 128, 255]);
//! let heat = detect_blur(&buf, &registry).unwrap();
//! assert_eq!(heat.get(4, 4), [0, 0, 0, 255]);
//! ```

use crate::kernel::{KernelRegistry, names};
use crate::spatial::apply_filter;
use crate::OpsResult;
use rasterlab_core::{CHANNELS, PixelBuffer, luminance_rec601, saturate};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Per-pixel luminance of a buffer as a flat f32 plane.
fn luminance_plane(buf: &PixelBuffer) -> Vec<f32> {
    buf.data()
        .chunks_exact(CHANNELS)
        .map(|px| luminance_rec601([px[0] as f32, px[1] as f32, px[2] as f32]))
        .collect()
}

/// Renders the gradient-magnitude heatmap of a buffer.
///
/// Runs the two stock directional edge kernels through the injected
/// registry, combines the responses as `sqrt(h² + v²)` per pixel, min–max
/// normalizes to [0, 255] and emits a red-only, opaque heatmap. An image
/// with no gradient variation (uniform magnitude) renders black.
///
/// # Errors
///
/// Returns [`OpsError::KernelNotFound`](crate::OpsError::KernelNotFound)
/// when an injected registry is missing either directional kernel.
pub fn detect_blur(src: &PixelBuffer, registry: &KernelRegistry) -> OpsResult<PixelBuffer> {
    let (width, height) = src.dimensions();
    debug!(width, height, "detect_blur");

    let horiz = apply_filter(src, registry, names::HORIZONTAL_EDGE)?;
    let vert = apply_filter(src, registry, names::VERTICAL_EDGE)?;

    let mut out = PixelBuffer::new(width, height);
    if src.is_empty() {
        return Ok(out);
    }

    let h_lum = luminance_plane(&horiz);
    let v_lum = luminance_plane(&vert);
    let magnitude: Vec<f32> = h_lum
        .iter()
        .zip(&v_lum)
        .map(|(h, v)| (h * h + v * v).sqrt())
        .collect();

    let min = magnitude.iter().fold(f32::INFINITY, |a, &b| a.min(b));
    let max = magnitude.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let range = max - min;

    for (slot, m) in out.data_mut().chunks_exact_mut(CHANNELS).zip(&magnitude) {
        let v = if range > 0.0 {
            saturate((m - min) / range * 255.0)
        } else {
            0
        };
        slot[0] = v;
        slot[1] = 0;
        slot[2] = 0;
        slot[3] = 255;
    }

    Ok(out)
}
