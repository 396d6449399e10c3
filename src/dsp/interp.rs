//! Interpolation kernels for reading a sample stream at fractional positions.
//!
//! Variable-speed playback reads between input samples, so the read position
//! is a fraction. Linear interpolation is cheap and exact at integer
//! positions (frac = 0 returns the sample untouched, which keeps nominal
//! 1.0x playback bit-transparent). Catmull-Rom cubic trades a little CPU for
//! noticeably less high-frequency aliasing on fast scratches.

/// Linear interpolation between two adjacent samples.
#[inline]
pub fn lerp(x0: f32, x1: f32, frac: f32) -> f32 {
    x0 + (x1 - x0) * frac
}

/// Catmull-Rom cubic interpolation (4-point, tension 0.5).
///
/// The spline passes through all control points, so frac = 0 returns `x1`
/// exactly, and the first derivative is continuous across sample boundaries.
#[inline]
pub fn catmull_rom(x0: f32, x1: f32, x2: f32, x3: f32, frac: f32) -> f32 {
    let t = frac;
    let t2 = t * t;
    let t3 = t2 * t;

    let c0 = -0.5 * t3 + t2 - 0.5 * t;
    let c1 = 1.5 * t3 - 2.5 * t2 + 1.0;
    let c2 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
    let c3 = 0.5 * t3 - 0.5 * t2;

    x0 * c0 + x1 * c1 + x2 * c2 + x3 * c3
}
