//! Error types for engine operations.

use thiserror::Error;

/// Error type for engine operations.
///
/// The only failure expected to propagate out of a processing call is a
/// kernel-registry miss; unknown filter or projection selector tags degrade
/// to a pass-through copy instead of erroring, and pixel-level bounds
/// violations are absorbed by [`rasterlab_core::PixelBuffer`].
#[derive(Error, Debug)]
pub enum OpsError {
    /// Requested spatial kernel name is absent from the registry.
    #[error("kernel not found: {0}")]
    KernelNotFound(String),

    /// Invalid parameter value (kernel construction misuse).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for engine operations.
pub type OpsResult<T> = Result<T, OpsError>;
