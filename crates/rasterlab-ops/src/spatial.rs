//! 2D convolution over pixel buffers.
//!
//! [`apply_filter`] resolves a kernel by name in an injected
//! [`KernelRegistry`] and convolves the buffer with it; a registry miss is
//! the engine's one hard error, [`OpsError::KernelNotFound`]. [`convolve`]
//! is the underlying engine for callers that already hold a [`Kernel`].
//!
//! # Boundary and Alpha Policy
//!
//! Sample coordinates past an edge clamp to the nearest edge pixel
//! (replication), never zero-fill. R, G and B are convolved independently;
//! alpha is copied verbatim from the source pixel at the same position.
//! Each weighted sum goes through the kernel's [`Remap`](crate::Remap)
//! policy before the saturating u8 conversion.
//!
//! # Example
//!
//! ```
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::kernel::{KernelRegistry, names};
//! use rasterlab_ops::spatial::apply_filter;
//!
//! let registry = KernelRegistry::stock();
//! let buf = PixelBuffer::filled(16, 16, [200, 100, 50, 255]);
//!
//! let out = apply_filter(&buf, &registry, names::IDENTITY).unwrap();
//! assert_eq!(out, buf);
//!
//! assert!(apply_filter(&buf, &registry, "Nope").is_err());
//! ```

use crate::kernel::{Kernel, KernelRegistry};
use crate::{OpsError, OpsResult};
use rasterlab_core::{CHANNELS, PixelBuffer};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Applies the named spatial filter to a buffer.
///
/// # Errors
///
/// Returns [`OpsError::KernelNotFound`] with the offending name when the
/// registry has no kernel under `name`. This is the only failure mode; the
/// convolution itself cannot fail.
pub fn apply_filter(
    src: &PixelBuffer,
    registry: &KernelRegistry,
    name: &str,
) -> OpsResult<PixelBuffer> {
    trace!(
        width = src.width(),
        height = src.height(),
        kernel = name,
        "apply_filter"
    );
    let kernel = registry
        .get(name)
        .ok_or_else(|| OpsError::KernelNotFound(name.to_string()))?;
    Ok(convolve(src, kernel))
}

/// Convolves a buffer with a kernel, returning a new buffer.
///
/// Output dimensions always equal input dimensions. Rows are computed
/// independently and fan out across threads when the `parallel` feature is
/// enabled.
pub fn convolve(src: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let (width, height) = src.dimensions();
    let mut out = PixelBuffer::new(width, height);
    if src.is_empty() {
        return out;
    }

    let row_len = width as usize * CHANNELS;

    #[cfg(feature = "parallel")]
    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| convolve_row(src, kernel, y, row));

    #[cfg(not(feature = "parallel"))]
    for (y, row) in out.data_mut().chunks_mut(row_len).enumerate() {
        convolve_row(src, kernel, y, row);
    }

    out
}

/// Computes one output row of the convolution.
fn convolve_row(src: &PixelBuffer, kernel: &Kernel, y: usize, row: &mut [u8]) {
    let width = src.width() as usize;
    let size = kernel.size();
    let half = kernel.half() as i32;
    let remap = kernel.remap();

    for x in 0..width {
        let mut sum = [0.0f32; 3];
        for ky in 0..size {
            for kx in 0..size {
                let w = kernel.weight(kx, ky);
                let px = src.get_clamped(x as i32 + kx as i32 - half, y as i32 + ky as i32 - half);
                sum[0] += px[0] as f32 * w;
                sum[1] += px[1] as f32 * w;
                sum[2] += px[2] as f32 * w;
            }
        }

        let alpha = src.get(x as u32, y as u32)[3];
        let off = x * CHANNELS;
        row[off] = remap.apply(sum[0]);
        row[off + 1] = remap.apply(sum[1]);
        row[off + 2] = remap.apply(sum[2]);
        row[off + 3] = alpha;
    }
}
