//! Convolution kernels and the named-kernel registry.
//!
//! A [`Kernel`] is a square, odd-sized matrix of `f32` weights plus a
//! per-kernel [`Remap`] policy describing how weighted sums are brought back
//! into the 8-bit channel range. Kernels are looked up by name in a
//! [`KernelRegistry`] — an explicit value passed into
//! [`apply_filter`](crate::spatial::apply_filter), never a global.
//!
//! Weights are taken as authored: blur kernels are expected to sum to 1,
//! edge kernels may sum to 0. The engine does not re-normalize.
//!
//! # Example
//!
//! ```
//! use rasterlab_ops::kernel::{Kernel, KernelRegistry, names};
//!
//! let mut registry = KernelRegistry::stock();
//! assert!(registry.get(names::GAUSSIAN_BLUR).is_some());
//!
//! // Custom kernel injection.
//! registry.register("Soft Blur", Kernel::gaussian(3, 0.8));
//! assert!(registry.get("Soft Blur").is_some());
//! ```

use crate::{OpsError, OpsResult};
use rasterlab_core::saturate;
use std::collections::HashMap;

/// Stable selector strings for the stock kernel registry.
///
/// These names are case-sensitive and part of the engine's dispatch
/// contract with callers.
pub mod names {
    /// 3×3 delta kernel; output equals input.
    pub const IDENTITY: &str = "Identity";
    /// 5×5 normalized Gaussian blur.
    pub const GAUSSIAN_BLUR: &str = "Gaussian Blur";
    /// 3×3 sharpening kernel.
    pub const SHARPEN: &str = "Sharpen";
    /// 3×3 mean-removal high-pass kernel.
    pub const MEAN_REMOVAL: &str = "Mean Removal";
    /// 3×3 Laplacian emboss kernel (historical spelling is part of the
    /// stable name).
    pub const EMBOSS_LAPLASCIAN: &str = "Emboss Laplascian";
    /// 3×3 Sobel x-gradient kernel.
    pub const SOBEL: &str = "Sobel";
    /// 3×3 Sobel y-gradient kernel; responds to horizontal edges.
    pub const HORIZONTAL_EDGE: &str = "Horizontal Edge";
    /// 3×3 Sobel x-gradient kernel; responds to vertical edges.
    pub const VERTICAL_EDGE: &str = "Vertical Edge";

    /// Every stock registry name, in registration order.
    pub const ALL: [&str; 8] = [
        IDENTITY,
        GAUSSIAN_BLUR,
        SHARPEN,
        MEAN_REMOVAL,
        EMBOSS_LAPLASCIAN,
        SOBEL,
        HORIZONTAL_EDGE,
        VERTICAL_EDGE,
    ];
}

/// Post-summation policy mapping a weighted channel sum back to u8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Remap {
    /// Plain saturating conversion to [0, 255].
    #[default]
    Saturate,
    /// Bias-and-scale remap `v * 2 + 128` before saturating.
    ///
    /// Used by zero-sum kernels whose raw output would sit near zero; the
    /// remap recenters it around mid-gray so the result stays visible.
    Contrast,
}

impl Remap {
    /// Applies the policy to a weighted channel sum.
    #[inline]
    pub fn apply(self, value: f32) -> u8 {
        match self {
            Remap::Saturate => saturate(value),
            Remap::Contrast => saturate(value * 2.0 + 128.0),
        }
    }
}

/// Square convolution kernel with an odd side length.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f32>,
    size: usize,
    remap: Remap,
}

impl Kernel {
    /// Creates a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] when `size` is even or
    /// `data.len() != size * size`.
    pub fn new(data: Vec<f32>, size: usize) -> OpsResult<Self> {
        if size % 2 == 0 {
            return Err(OpsError::InvalidParameter(
                "kernel size must be odd".into(),
            ));
        }
        if data.len() != size * size {
            return Err(OpsError::InvalidParameter(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                size,
                size
            )));
        }
        Ok(Self {
            data,
            size,
            remap: Remap::Saturate,
        })
    }

    /// Sets the post-summation remap policy.
    pub fn with_remap(mut self, remap: Remap) -> Self {
        self.remap = remap;
        self
    }

    /// Creates a delta kernel: weight 1 at the center, 0 elsewhere.
    ///
    /// Even sizes are bumped to the next odd size.
    pub fn identity(size: usize) -> Self {
        let size = if size % 2 == 0 { size + 1 } else { size };
        let mut data = vec![0.0; size * size];
        data[size * size / 2] = 1.0;
        Self {
            data,
            size,
            remap: Remap::Saturate,
        }
    }

    /// Creates a normalized Gaussian kernel.
    ///
    /// # Arguments
    ///
    /// * `size` - Kernel side length (even sizes are bumped to odd)
    /// * `sigma` - Standard deviation (blur amount)
    pub fn gaussian(size: usize, sigma: f32) -> Self {
        let size = if size % 2 == 0 { size + 1 } else { size };
        let half = (size / 2) as i32;
        let sigma2 = 2.0 * sigma * sigma;

        let mut data = Vec::with_capacity(size * size);
        let mut sum = 0.0f32;
        for y in -half..=half {
            for x in -half..=half {
                let d = (x * x + y * y) as f32;
                let w = (-d / sigma2).exp();
                data.push(w);
                sum += w;
            }
        }
        for w in &mut data {
            *w /= sum;
        }

        Self {
            data,
            size,
            remap: Remap::Saturate,
        }
    }

    /// Returns the side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the kernel radius (half the side length, rounded down).
    #[inline]
    pub fn half(&self) -> usize {
        self.size / 2
    }

    /// Returns the weight at kernel position (kx, ky).
    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f32 {
        self.data[ky * self.size + kx]
    }

    /// Returns the remap policy.
    #[inline]
    pub fn remap(&self) -> Remap {
        self.remap
    }

    /// Returns the raw row-major weights.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// Named kernel registry.
///
/// Built once and passed by reference into spatial-filter calls. The stock
/// set lives in [`KernelRegistry::stock`]; callers may register additional
/// kernels under their own names.
#[derive(Debug, Clone)]
pub struct KernelRegistry {
    kernels: HashMap<String, Kernel>,
}

impl KernelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            kernels: HashMap::new(),
        }
    }

    /// Builds the stock registry.
    ///
    /// Blur weights sum to 1; the edge kernels sum to 0. The Laplacian
    /// emboss kernel carries the [`Remap::Contrast`] policy so its zero-sum
    /// output lands around mid-gray.
    pub fn stock() -> Self {
        // Stock weights are module-internal constants; build kernels directly
        // rather than routing through the fallible constructor.
        fn fixed(data: Vec<f32>, size: usize, remap: Remap) -> Kernel {
            debug_assert_eq!(data.len(), size * size);
            Kernel { data, size, remap }
        }

        let mut reg = Self::new();

        reg.register(names::IDENTITY, Kernel::identity(3));

        #[rustfmt::skip]
        let gaussian = vec![
            1.0,  4.0,  7.0,  4.0, 1.0,
            4.0, 16.0, 26.0, 16.0, 4.0,
            7.0, 26.0, 41.0, 26.0, 7.0,
            4.0, 16.0, 26.0, 16.0, 4.0,
            1.0,  4.0,  7.0,  4.0, 1.0,
        ];
        let gaussian: Vec<f32> = gaussian.into_iter().map(|w| w / 273.0).collect();
        reg.register(names::GAUSSIAN_BLUR, fixed(gaussian, 5, Remap::Saturate));

        #[rustfmt::skip]
        reg.register(names::SHARPEN, fixed(vec![
             0.0, -1.0,  0.0,
            -1.0,  5.0, -1.0,
             0.0, -1.0,  0.0,
        ], 3, Remap::Saturate));

        #[rustfmt::skip]
        reg.register(names::MEAN_REMOVAL, fixed(vec![
            -1.0, -1.0, -1.0,
            -1.0,  9.0, -1.0,
            -1.0, -1.0, -1.0,
        ], 3, Remap::Saturate));

        #[rustfmt::skip]
        reg.register(names::EMBOSS_LAPLASCIAN, fixed(vec![
            -1.0, -1.0, -1.0,
            -1.0,  8.0, -1.0,
            -1.0, -1.0, -1.0,
        ], 3, Remap::Contrast));

        #[rustfmt::skip]
        reg.register(names::SOBEL, fixed(vec![
            1.0, 0.0, -1.0,
            2.0, 0.0, -2.0,
            1.0, 0.0, -1.0,
        ], 3, Remap::Saturate));

        #[rustfmt::skip]
        reg.register(names::HORIZONTAL_EDGE, fixed(vec![
            -1.0, -2.0, -1.0,
             0.0,  0.0,  0.0,
             1.0,  2.0,  1.0,
        ], 3, Remap::Saturate));

        #[rustfmt::skip]
        reg.register(names::VERTICAL_EDGE, fixed(vec![
            -1.0, 0.0, 1.0,
            -2.0, 0.0, 2.0,
            -1.0, 0.0, 1.0,
        ], 3, Remap::Saturate));

        reg
    }

    /// Registers a kernel under a name, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, kernel: Kernel) {
        self.kernels.insert(name.into(), kernel);
    }

    /// Looks up a kernel by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Kernel> {
        self.kernels.get(name)
    }

    /// Returns `true` if the registry contains the name.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.kernels.contains_key(name)
    }

    /// Iterates over the registered names (unordered).
    pub fn kernel_names(&self) -> impl Iterator<Item = &str> {
        self.kernels.keys().map(String::as_str)
    }

    /// Returns the number of registered kernels.
    #[inline]
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Returns `true` if no kernels are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
