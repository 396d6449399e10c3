//! Low-level DSP primitives used by the effect stages.
//!
//! These components are allocation-free on the render path and realtime-safe,
//! so the stages can call them per sample from the audio callback. They stay
//! focused on the signal math; parameter handling, clamping policy, and fault
//! reporting live in the `fx` and `engine` layers.

/// Circular delay line with a fractionally-interpolated read tap.
pub mod delay;
/// State-variable filter core with multiple responses.
pub mod filter;
/// Fractional-position sample interpolation kernels.
pub mod interp;
