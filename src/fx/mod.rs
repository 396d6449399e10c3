//! Block-based effect stages driven by the engine.
//!
//! Each stage wraps the low-level `dsp` primitives with parameter clamping,
//! state carried across block boundaries, and a `render` over a mutable
//! sample buffer. Stages never talk to each other; the engine sequences them
//! in a fixed order (varispeed, flanger, filter, gain) and feeds each one the
//! values it needs from the current parameter snapshot.

/// Resonant filter stage with recompute-on-change coefficients.
pub mod filter;
/// LFO-modulated short delay mixed with the dry signal.
pub mod flanger;
/// Final volume scaling with click-free ramping.
pub mod gain;
/// Variable-rate playback: pitch bend and jog-wheel scratching.
pub mod varispeed;

pub use varispeed::Interpolation;

/// Per-block render context shared by all stages.
#[derive(Debug, Clone, Copy)]
pub struct BlockCtx {
    pub sample_rate: f32,
}
