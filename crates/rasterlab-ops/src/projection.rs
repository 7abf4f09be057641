//! Axis, polar and isometric projections.
//!
//! Projections reduce or re-map intensity along an axis or sampling pattern:
//! row/column means ([`horizontal`], [`vertical`]), an approximate polar walk
//! ([`radial`]), a center-ring average ([`angular`]) and a height-field
//! plot ([`isometric`]). All of them preserve the source alpha per pixel
//! except the isometric plot, which composes over an opaque background.
//!
//! [`dispatch`] routes by [`ProjectionKind`]; an unrecognized tag returns a
//! verbatim copy of the input rather than an error, so stale selector
//! strings stay harmless.
//!
//! # Example
//!
//! ```
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::projection::{ProjectionKind, dispatch};
//!
//! let buf = PixelBuffer::filled(8, 8, [60, 120, 180, 255]);
//! let out = dispatch(&buf, ProjectionKind::from("horizontal"));
//! assert_eq!(out.dimensions(), buf.dimensions());
//!
//! // Unknown tags pass the input through untouched.
//! let copy = dispatch(&buf, ProjectionKind::from("bogus-type"));
//! assert_eq!(copy, buf);
//! ```

use rasterlab_core::{CHANNELS, PixelBuffer, luminance_rec601, saturate};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Per-step angle drift of the radial sampling walk, in radians.
///
/// The walk from the center toward a pixel is deliberately not a straight
/// ray: each step rotates by this increment, giving the characteristic
/// smeared polar sampling instead of a true radial integral.
pub const RADIAL_ANGLE_DRIFT: f32 = 0.01;

/// Radius in pixels of the ring sampled by the angular projection.
pub const ANGULAR_RING_RADIUS: f32 = 5.0;

/// Source-grid sampling stride of the isometric plot.
pub const ISO_GRID_STRIDE: usize = 4;

/// Horizontal scale of the isometric projection basis.
pub const ISO_SCALE_X: f32 = 0.5;

/// Vertical scale of the isometric projection basis.
pub const ISO_SCALE_Y: f32 = 0.3;

/// Height-field scale applied to per-pixel luminance.
const ISO_HEIGHT_SCALE: f32 = 0.3;

/// Ambient term of the isometric shading.
const ISO_AMBIENT: f32 = 0.35;

/// Background fill of the isometric plot (dark blue, opaque).
const ISO_BACKGROUND: [u8; 4] = [16, 24, 64, 255];

/// Projection selector.
///
/// Parsed from the stable tags `"horizontal"`, `"vertical"`, `"radial"`,
/// `"angular"` and `"isometric"` (case-sensitive); anything else is
/// [`ProjectionKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Row-mean broadcast.
    Horizontal,
    /// Column-mean broadcast.
    Vertical,
    /// Polar walk from the center.
    Radial,
    /// Center-ring average broadcast.
    Angular,
    /// Height-field plot.
    Isometric,
    /// Unrecognized tag; pass-through.
    Unknown,
}

impl From<&str> for ProjectionKind {
    fn from(tag: &str) -> Self {
        match tag {
            "horizontal" => ProjectionKind::Horizontal,
            "vertical" => ProjectionKind::Vertical,
            "radial" => ProjectionKind::Radial,
            "angular" => ProjectionKind::Angular,
            "isometric" => ProjectionKind::Isometric,
            _ => ProjectionKind::Unknown,
        }
    }
}

/// Euler rotation parameters and screen offset for [`isometric`].
///
/// Rotations are radians, applied in X → Y → Z order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IsometricParams {
    /// Horizontal screen offset of the plot, in pixels.
    pub offset_x: f32,
    /// Vertical screen offset of the plot, in pixels.
    pub offset_y: f32,
    /// Rotation around the X axis.
    pub rot_x: f32,
    /// Rotation around the Y axis.
    pub rot_y: f32,
    /// Rotation around the Z axis.
    pub rot_z: f32,
}

/// Broadcasts each row's per-channel mean across the row.
///
/// The mean is the truncating integer average of R, of G and of B over the
/// row's full width; alpha stays per-pixel.
pub fn horizontal(src: &PixelBuffer) -> PixelBuffer {
    let (width, height) = src.dimensions();
    trace!(width, height, "horizontal projection");
    let mut out = PixelBuffer::new(width, height);
    if src.is_empty() {
        return out;
    }

    let row_len = width as usize * CHANNELS;

    let project_row = |(y, row): (usize, &mut [u8])| {
        let src_row = src.row(y as u32);
        let mut sums = [0u32; 3];
        for px in src_row.chunks_exact(CHANNELS) {
            sums[0] += px[0] as u32;
            sums[1] += px[1] as u32;
            sums[2] += px[2] as u32;
        }
        let mean = [
            (sums[0] / width) as u8,
            (sums[1] / width) as u8,
            (sums[2] / width) as u8,
        ];
        for (out_px, src_px) in row
            .chunks_exact_mut(CHANNELS)
            .zip(src_row.chunks_exact(CHANNELS))
        {
            out_px[0] = mean[0];
            out_px[1] = mean[1];
            out_px[2] = mean[2];
            out_px[3] = src_px[3];
        }
    };

    #[cfg(feature = "parallel")]
    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(project_row);

    #[cfg(not(feature = "parallel"))]
    out.data_mut()
        .chunks_mut(row_len)
        .enumerate()
        .for_each(project_row);

    out
}

/// Broadcasts each column's per-channel mean down the column.
///
/// Symmetric to [`horizontal`].
pub fn vertical(src: &PixelBuffer) -> PixelBuffer {
    let (width, height) = src.dimensions();
    trace!(width, height, "vertical projection");
    let mut out = PixelBuffer::new(width, height);
    if src.is_empty() {
        return out;
    }

    let w = width as usize;

    // One pass over the source accumulates every column's sums.
    let mut sums = vec![[0u32; 3]; w];
    for row in src.data().chunks_exact(w * CHANNELS) {
        for (x, px) in row.chunks_exact(CHANNELS).enumerate() {
            sums[x][0] += px[0] as u32;
            sums[x][1] += px[1] as u32;
            sums[x][2] += px[2] as u32;
        }
    }
    let means: Vec<[u8; 3]> = sums
        .iter()
        .map(|s| {
            [
                (s[0] / height) as u8,
                (s[1] / height) as u8,
                (s[2] / height) as u8,
            ]
        })
        .collect();

    let row_len = w * CHANNELS;

    let project_row = |(y, row): (usize, &mut [u8])| {
        let src_row = src.row(y as u32);
        for (x, (out_px, src_px)) in row
            .chunks_exact_mut(CHANNELS)
            .zip(src_row.chunks_exact(CHANNELS))
            .enumerate()
        {
            out_px[0] = means[x][0];
            out_px[1] = means[x][1];
            out_px[2] = means[x][2];
            out_px[3] = src_px[3];
        }
    };

    #[cfg(feature = "parallel")]
    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(project_row);

    #[cfg(not(feature = "parallel"))]
    out.data_mut()
        .chunks_mut(row_len)
        .enumerate()
        .for_each(project_row);

    out
}

/// Samples the source at a fractional coordinate, defaulting to transparent
/// black outside the image.
#[inline]
fn sample_or_default(src: &PixelBuffer, x: f32, y: f32) -> [u8; 4] {
    let xi = x.round();
    let yi = y.round();
    if xi < 0.0 || yi < 0.0 {
        return [0; 4];
    }
    // Upper-bound violations are absorbed by get().
    src.get(xi as u32, yi as u32)
}

/// Polar-walk projection from the image center.
///
/// For each pixel, walks one sample per integer radius step from the center
/// out to the pixel's distance, drifting the angle by
/// [`RADIAL_ANGLE_DRIFT`] per step, averages the sampled channels and
/// divides by the distance. A pixel at the exact center (distance < 1)
/// copies the source pixel unchanged. Alpha stays per-pixel.
pub fn radial(src: &PixelBuffer) -> PixelBuffer {
    let (width, height) = src.dimensions();
    trace!(width, height, "radial projection");
    let mut out = PixelBuffer::new(width, height);
    if src.is_empty() {
        return out;
    }

    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let row_len = width as usize * CHANNELS;

    let project_row = |(y, row): (usize, &mut [u8])| {
        for x in 0..width as usize {
            let src_px = src.get(x as u32, y as u32);
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let off = x * CHANNELS;

            if dist < 1.0 {
                row[off..off + CHANNELS].copy_from_slice(&src_px);
                continue;
            }

            let angle = dy.atan2(dx);
            let steps = dist as usize;
            let mut sums = [0.0f32; 3];
            for step in 1..=steps {
                let a = angle + step as f32 * RADIAL_ANGLE_DRIFT;
                let r = step as f32;
                let sample = sample_or_default(src, cx + a.cos() * r, cy + a.sin() * r);
                sums[0] += sample[0] as f32;
                sums[1] += sample[1] as f32;
                sums[2] += sample[2] as f32;
            }
            let inv = 1.0 / steps as f32;
            row[off] = saturate(sums[0] * inv / dist);
            row[off + 1] = saturate(sums[1] * inv / dist);
            row[off + 2] = saturate(sums[2] * inv / dist);
            row[off + 3] = src_px[3];
        }
    };

    #[cfg(feature = "parallel")]
    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(project_row);

    #[cfg(not(feature = "parallel"))]
    out.data_mut()
        .chunks_mut(row_len)
        .enumerate()
        .for_each(project_row);

    out
}

/// Center-ring average projection.
///
/// Samples a ring of radius [`ANGULAR_RING_RADIUS`] around the image center
/// at all 360 integer degrees, averages the channels and broadcasts that
/// single value to every output pixel. The output is spatially uniform by
/// design; alpha stays per-pixel.
pub fn angular(src: &PixelBuffer) -> PixelBuffer {
    let (width, height) = src.dimensions();
    trace!(width, height, "angular projection");
    let mut out = PixelBuffer::new(width, height);
    if src.is_empty() {
        return out;
    }

    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;

    let mut sums = [0.0f32; 3];
    for deg in 0..360 {
        let a = (deg as f32).to_radians();
        let sample = sample_or_default(
            src,
            cx + a.cos() * ANGULAR_RING_RADIUS,
            cy + a.sin() * ANGULAR_RING_RADIUS,
        );
        sums[0] += sample[0] as f32;
        sums[1] += sample[1] as f32;
        sums[2] += sample[2] as f32;
    }
    let mean = [
        saturate(sums[0] / 360.0),
        saturate(sums[1] / 360.0),
        saturate(sums[2] / 360.0),
    ];

    for y in 0..height {
        for x in 0..width {
            let alpha = src.get(x, y)[3];
            out.set(x, y, [mean[0], mean[1], mean[2], alpha]);
        }
    }

    out
}

#[inline]
fn rotate_x(p: [f32; 3], a: f32) -> [f32; 3] {
    let (s, c) = a.sin_cos();
    [p[0], p[1] * c - p[2] * s, p[1] * s + p[2] * c]
}

#[inline]
fn rotate_y(p: [f32; 3], a: f32) -> [f32; 3] {
    let (s, c) = a.sin_cos();
    [p[0] * c + p[2] * s, p[1], -p[0] * s + p[2] * c]
}

#[inline]
fn rotate_z(p: [f32; 3], a: f32) -> [f32; 3] {
    let (s, c) = a.sin_cos();
    [p[0] * c - p[1] * s, p[0] * s + p[1] * c, p[2]]
}

/// Isometric height-field plot of the buffer's luminance.
///
/// Source pixels are sampled on a stride-[`ISO_GRID_STRIDE`] grid; each
/// sample becomes the 3D point `(x - w/2, y - h/2, luminance * scale)`,
/// rotated in X → Y → Z order and projected through the fixed isometric
/// basis onto the output, shaded by an ambient-plus-luminance term over a
/// dark-blue background. The output is intentionally sparse: only sampled
/// grid points are plotted, and points projected out of frame are absorbed.
pub fn isometric(src: &PixelBuffer, params: &IsometricParams) -> PixelBuffer {
    let (width, height) = src.dimensions();
    trace!(width, height, ?params, "isometric projection");
    if src.is_empty() {
        return PixelBuffer::new(width, height);
    }

    let mut out = PixelBuffer::filled(width, height, ISO_BACKGROUND);
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;

    for y in (0..height as usize).step_by(ISO_GRID_STRIDE) {
        for x in (0..width as usize).step_by(ISO_GRID_STRIDE) {
            let px = src.get(x as u32, y as u32);
            let lum = luminance_rec601([px[0] as f32, px[1] as f32, px[2] as f32]);

            let p = [x as f32 - cx, y as f32 - cy, lum * ISO_HEIGHT_SCALE];
            let p = rotate_x(p, params.rot_x);
            let p = rotate_y(p, params.rot_y);
            let p = rotate_z(p, params.rot_z);

            let sx = (p[0] - p[1]) * ISO_SCALE_X + cx + params.offset_x;
            let sy = (p[0] + p[1]) * ISO_SCALE_Y - p[2] + cy + params.offset_y;

            let shade = ISO_AMBIENT + (1.0 - ISO_AMBIENT) * lum / 255.0;
            let color = [
                saturate(px[0] as f32 * shade),
                saturate(px[1] as f32 * shade),
                saturate(px[2] as f32 * shade),
                255,
            ];

            let ix = sx.round();
            let iy = sy.round();
            if ix >= 0.0 && iy >= 0.0 {
                out.set(ix as u32, iy as u32, color);
            }
        }
    }

    out
}

/// Routes to a projection by selector.
///
/// [`ProjectionKind::Isometric`] runs with default parameters;
/// [`ProjectionKind::Unknown`] returns a verbatim copy of the input.
pub fn dispatch(src: &PixelBuffer, kind: ProjectionKind) -> PixelBuffer {
    match kind {
        ProjectionKind::Horizontal => horizontal(src),
        ProjectionKind::Vertical => vertical(src),
        ProjectionKind::Radial => radial(src),
        ProjectionKind::Angular => angular(src),
        ProjectionKind::Isometric => isometric(src, &IsometricParams::default()),
        ProjectionKind::Unknown => src.clone(),
    }
}

/// Runs the four reducing projections in their fixed order:
/// horizontal, vertical, radial, angular.
pub fn all(src: &PixelBuffer) -> [PixelBuffer; 4] {
    [horizontal(src), vertical(src), radial(src), angular(src)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_buffer() -> PixelBuffer {
        // 2x2: red, green / blue, gray — the reference scenario buffer.
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 128, 128, 128, 255,
        ];
        PixelBuffer::from_raw(2, 2, data).unwrap()
    }

    #[test]
    fn test_horizontal_row_means() {
        let out = horizontal(&quad_buffer());
        // Row 0: means R=(255+0)/2=127, G=(0+255)/2=127, B=0.
        assert_eq!(out.get(0, 0), [127, 127, 0, 255]);
        assert_eq!(out.get(1, 0), [127, 127, 0, 255]);
        // Row 1: R=(0+128)/2=64, G=64, B=(255+128)/2=191.
        assert_eq!(out.get(0, 1), [64, 64, 191, 255]);
        assert_eq!(out.get(1, 1), [64, 64, 191, 255]);
    }

    #[test]
    fn test_vertical_column_means() {
        let out = vertical(&quad_buffer());
        // Column 0: R=(255+0)/2=127, G=0, B=(0+255)/2=127.
        assert_eq!(out.get(0, 0), [127, 0, 127, 255]);
        assert_eq!(out.get(0, 1), [127, 0, 127, 255]);
        // Column 1: R=(0+128)/2=64, G=(255+128)/2=191, B=64.
        assert_eq!(out.get(1, 0), [64, 191, 64, 255]);
        assert_eq!(out.get(1, 1), [64, 191, 64, 255]);
    }

    #[test]
    fn test_mean_truncates() {
        // 3-wide row of 1, 1, 0: integer mean truncates to 0.
        let mut buf = PixelBuffer::new(3, 1);
        buf.set(0, 0, [1, 0, 0, 255]);
        buf.set(1, 0, [1, 0, 0, 255]);
        let out = horizontal(&buf);
        assert_eq!(out.get(0, 0)[0], 0);
    }

    #[test]
    fn test_projection_alpha_preserved() {
        let mut buf = PixelBuffer::filled(9, 9, [90, 140, 200, 255]);
        buf.set(2, 5, [90, 140, 200, 31]);
        for kind in [
            ProjectionKind::Horizontal,
            ProjectionKind::Vertical,
            ProjectionKind::Radial,
            ProjectionKind::Angular,
        ] {
            let out = dispatch(&buf, kind);
            assert_eq!(out.get(2, 5)[3], 31, "{kind:?} dropped alpha");
            assert_eq!(out.get(0, 0)[3], 255);
        }
    }

    #[test]
    fn test_radial_center_copies_source() {
        let mut buf = PixelBuffer::filled(9, 9, [10, 10, 10, 255]);
        // Center of a 9x9 buffer is (4.5, 4.5); pixel (4, 4) sits within
        // distance 1 of it.
        buf.set(4, 4, [200, 100, 50, 77]);
        let out = radial(&buf);
        assert_eq!(out.get(4, 4), [200, 100, 50, 77]);
    }

    #[test]
    fn test_radial_darkens_with_distance() {
        let buf = PixelBuffer::filled(33, 33, [240, 240, 240, 255]);
        let out = radial(&buf);
        // Averaged ~240 divided by a distance ≥ 2: strictly darker than the
        // source away from the center.
        let edge = out.get(0, 16);
        assert!(edge[0] < 240);
        let near = out.get(18, 16);
        // Closer to the center the divisor shrinks, so values grow.
        assert!(near[0] >= edge[0]);
    }

    #[test]
    fn test_angular_is_spatially_uniform() {
        let mut buf = PixelBuffer::filled(32, 32, [10, 20, 30, 255]);
        buf.set(16, 11, [250, 0, 0, 255]); // on the ring, radius 5 up
        let out = angular(&buf);
        let first = out.get(0, 0);
        for (_, _, px) in out.pixels() {
            assert_eq!(&px[..3], &first[..3]);
        }
    }

    #[test]
    fn test_angular_averages_ring() {
        // Uniform image: the ring average equals the image color.
        let buf = PixelBuffer::filled(32, 32, [60, 90, 120, 255]);
        let out = angular(&buf);
        let px = out.get(3, 3);
        assert!((px[0] as i32 - 60).abs() <= 1);
        assert!((px[1] as i32 - 90).abs() <= 1);
        assert!((px[2] as i32 - 120).abs() <= 1);
    }

    #[test]
    fn test_isometric_fills_background() {
        let buf = PixelBuffer::new(16, 16);
        let out = isometric(&buf, &IsometricParams::default());
        assert_eq!(out.dimensions(), (16, 16));
        // Black input plots black points over the background; most pixels
        // keep the fill.
        let fill_count = out
            .pixels()
            .filter(|(_, _, px)| *px == ISO_BACKGROUND)
            .count();
        assert!(fill_count > 16 * 16 / 2);
    }

    #[test]
    fn test_isometric_plots_samples() {
        // Low luminance keeps the height term small enough that samples of
        // a small test image still project in frame.
        let buf = PixelBuffer::filled(32, 32, [40, 40, 40, 255]);
        let out = isometric(&buf, &IsometricParams::default());
        assert!(out.pixels().any(|(_, _, px)| px != ISO_BACKGROUND));
    }

    #[test]
    fn test_isometric_offset_shifts_plot() {
        let buf = PixelBuffer::filled(32, 32, [60, 60, 60, 255]);
        let base = isometric(&buf, &IsometricParams::default());
        let shifted = isometric(
            &buf,
            &IsometricParams {
                offset_x: 3.0,
                ..Default::default()
            },
        );
        assert_ne!(base, shifted);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(ProjectionKind::from("horizontal"), ProjectionKind::Horizontal);
        assert_eq!(ProjectionKind::from("vertical"), ProjectionKind::Vertical);
        assert_eq!(ProjectionKind::from("radial"), ProjectionKind::Radial);
        assert_eq!(ProjectionKind::from("angular"), ProjectionKind::Angular);
        assert_eq!(ProjectionKind::from("isometric"), ProjectionKind::Isometric);
        assert_eq!(ProjectionKind::from("Horizontal"), ProjectionKind::Unknown);
        assert_eq!(ProjectionKind::from(""), ProjectionKind::Unknown);
    }

    #[test]
    fn test_dispatch_unknown_verbatim_copy() {
        let buf = quad_buffer();
        let out = dispatch(&buf, ProjectionKind::from("bogus-type"));
        assert_eq!(out.data(), buf.data());
    }

    #[test]
    fn test_all_order_and_count() {
        let buf = quad_buffer();
        let results = all(&buf);
        assert_eq!(results[0], horizontal(&buf));
        assert_eq!(results[1], vertical(&buf));
        assert_eq!(results[2], radial(&buf));
        assert_eq!(results[3], angular(&buf));
    }

    #[test]
    fn test_empty_buffers() {
        let buf = PixelBuffer::new(0, 0);
        for kind in [
            ProjectionKind::Horizontal,
            ProjectionKind::Vertical,
            ProjectionKind::Radial,
            ProjectionKind::Angular,
            ProjectionKind::Isometric,
        ] {
            assert!(dispatch(&buf, kind).is_empty());
        }
    }
}
