//! # rasterlab-core
//!
//! Core types for the rasterlab pixel processing engine.
//!
//! This crate provides the foundational pieces shared by every engine
//! operation:
//!
//! - [`PixelBuffer`] - Owned row-major RGBA byte buffer with bounds-absorbing
//!   pixel access
//! - [`pixel`] - Rec.601 luminance weights and the saturating u8 conversion
//! - [`Error`] - Dimension validation errors
//!
//! ## Design Philosophy
//!
//! The engine is a set of deterministic, stateless transforms: every
//! operation takes a `&PixelBuffer` plus parameters and returns a freshly
//! allocated `PixelBuffer`. There is no shared mutable state, no cache, and
//! no identity beyond structural equality.
//!
//! Two different failure policies coexist by design:
//!
//! - **Per-pixel access absorbs bounds violations** (default-pixel reads,
//!   dropped writes, clamped sampling) so that convolution and sampling
//!   loops never branch on failure at image edges.
//! - **Whole-buffer dimension mismatches fail loudly** ([`Error`]) because
//!   they always indicate a caller bug.
//!
//! ## Crate Structure
//!
//! This crate is the foundation of rasterlab and has no internal
//! dependencies. The operation crates depend on it:
//!
//! ```text
//! rasterlab-core (this crate)
//!    ^
//!    |
//!    +-- rasterlab-ops (convolution, frequency analysis, projections)
//!    +-- rasterlab-bench (benchmarks)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod pixel;

// Re-exports for convenience
pub use buffer::{CHANNELS, PixelBuffer};
pub use error::{Error, Result};
pub use pixel::{
    REC601_LUMA, REC601_LUMA_B, REC601_LUMA_G, REC601_LUMA_R, luminance_rec601, saturate,
};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use rasterlab_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{CHANNELS, PixelBuffer};
    pub use crate::error::{Error, Result};
    pub use crate::pixel::{
        REC601_LUMA, REC601_LUMA_B, REC601_LUMA_G, REC601_LUMA_R, luminance_rec601, saturate,
    };
}
