//! # rasterlab-ops
//!
//! Pixel-buffer processing operations for the rasterlab engine.
//!
//! Every operation is a pure function: it takes a
//! [`PixelBuffer`](rasterlab_core::PixelBuffer) reference plus parameters
//! and returns a freshly allocated buffer (or frequency field). Operations
//! never mutate their input and share no state across calls.
//!
//! # Modules
//!
//! - [`kernel`] - Convolution kernels and the named-kernel registry
//! - [`spatial`] - 2D convolution / spatial filtering
//! - [`frequency`] - 2D DFT, spectrum visualization, frequency masking
//! - [`projection`] - Axis, polar and isometric projections
//! - [`edge`] - Gradient-magnitude blur/edge heatmap
//!
//! # Dispatch and Failure Policy
//!
//! Spatial kernels are addressed by name through an explicit, injectable
//! [`KernelRegistry`]; a missing name is the engine's single hard error,
//! [`OpsError::KernelNotFound`]. Frequency-filter and projection selectors
//! are closed enums parsed from stable strings, with an explicit `Unknown`
//! arm that passes the input through verbatim — stale selector values from
//! a UI degrade gracefully instead of failing.
//!
//! # Example
//!
//! ```
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::kernel::{KernelRegistry, names};
//! use rasterlab_ops::{projection, spatial};
//!
//! let registry = KernelRegistry::stock();
//! let buf = PixelBuffer::filled(32, 32, [180, 90, 45, 255]);
//!
//! let blurred = spatial::apply_filter(&buf, &registry, names::GAUSSIAN_BLUR).unwrap();
//! let profile = projection::horizontal(&blurred);
//! assert_eq!(profile.dimensions(), buf.dimensions());
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - Row-parallel fan-out of the per-pixel loops via
//!   rayon. Output is identical with the feature off; only wall-clock time
//!   changes.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod edge;
pub mod frequency;
pub mod kernel;
pub mod projection;
pub mod spatial;

pub use error::{OpsError, OpsResult};
pub use frequency::{FilterKind, FrequencyField, FrequencyMask, TransformOptions};
pub use kernel::{Kernel, KernelRegistry, Remap};
pub use projection::{IsometricParams, ProjectionKind};
