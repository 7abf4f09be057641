//! Error types for rasterlab-core operations.
//!
//! Buffer construction and buffer-to-buffer copies validate their dimensions
//! and report mismatches through [`Error`]. Per-pixel bounds violations are
//! deliberately *not* errors — [`crate::PixelBuffer::get`] and
//! [`crate::PixelBuffer::set`] absorb them so that tight sampling loops stay
//! branch-light at the image edges.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when constructing or copying pixel buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Raw data length does not match the declared dimensions.
    ///
    /// Returned by [`crate::PixelBuffer::from_raw`] when
    /// `data.len() != width * height * 4`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// Why the dimensions are invalid
        reason: String,
    },

    /// Buffer dimensions don't match for the operation.
    ///
    /// Returned by [`crate::PixelBuffer::copy_from`] when source and
    /// destination differ in size.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// Destination width
        a_width: u32,
        /// Destination height
        a_height: u32,
        /// Source width
        b_width: u32,
        /// Source height
        b_height: u32,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_display() {
        let err = Error::invalid_dimensions(8, 4, "expected 128 bytes, got 12");
        let msg = err.to_string();
        assert!(msg.contains("8x4"));
        assert!(msg.contains("128"));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = Error::dimension_mismatch((100, 100), (50, 200));
        let msg = err.to_string();
        assert!(msg.contains("100x100"));
        assert!(msg.contains("50x200"));
    }
}
