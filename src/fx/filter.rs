//! Resonant filter stage: parameter clamping, recompute-on-change
//! coefficients, and blow-up recovery around the SVF core.

use crate::dsp::filter::{coeff_g, coeff_k, FilterShape, SVFilter};
use crate::fx::BlockCtx;
use crate::params::{CUTOFF_HZ, RESONANCE_Q};

/// Cutoff ceiling as a fraction of the sample rate. Above ~0.45 fs the
/// prewarped tangent blows up toward Nyquist.
const MAX_CUTOFF_RATIO: f32 = 0.45;

/// Any sample beyond this magnitude is treated as a resonant blow-up; the
/// stage resets rather than letting the feedback run away.
const SANITY_BOUND: f32 = 1.0e4;

pub struct FilterStage {
    svf: SVFilter,
    shape: FilterShape,
    // Cached design inputs; coefficients are recomputed only when one of
    // these changes since the last block.
    cutoff_hz: f32,
    resonance: f32,
    sample_rate: f32,
    g: f32,
    k: f32,
}

impl FilterStage {
    pub fn new() -> Self {
        Self::with_shape(FilterShape::LowPass)
    }

    pub fn with_shape(shape: FilterShape) -> Self {
        Self {
            svf: SVFilter::new(),
            shape,
            cutoff_hz: 0.0,
            resonance: 0.0,
            sample_rate: 0.0,
            g: 0.0,
            k: 0.0,
        }
    }

    fn update_coefficients(&mut self, cutoff_hz: f32, resonance: f32, sample_rate: f32) {
        let cutoff = cutoff_hz.clamp(CUTOFF_HZ.0, sample_rate * MAX_CUTOFF_RATIO);
        let q = resonance.clamp(RESONANCE_Q.0, RESONANCE_Q.1);

        if cutoff != self.cutoff_hz || q != self.resonance || sample_rate != self.sample_rate {
            self.cutoff_hz = cutoff;
            self.resonance = q;
            self.sample_rate = sample_rate;
            self.g = coeff_g(cutoff, sample_rate);
            self.k = coeff_k(q);
        }
    }

    /// Filter the block in place. Returns true if numeric instability was
    /// detected; the block is then replaced with silence and the filter
    /// history cleared, so nothing non-finite leaves the stage.
    #[must_use]
    pub fn render(&mut self, buf: &mut [f32], ctx: &BlockCtx, cutoff_hz: f32, resonance: f32) -> bool {
        self.update_coefficients(cutoff_hz, resonance, ctx.sample_rate);

        let mut peak = 0.0f32;
        for sample in buf.iter_mut() {
            let out = self.svf.next_sample(*sample, self.g, self.k);
            *sample = match self.shape {
                FilterShape::LowPass => out.lowpass,
                FilterShape::HighPass => out.highpass,
                FilterShape::BandPass => out.bandpass,
                FilterShape::Notch => out.notch,
            };
            peak = peak.max(sample.abs());
        }

        if !self.svf.is_finite() || !peak.is_finite() || peak > SANITY_BOUND {
            self.svf.reset();
            buf.fill(0.0);
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.svf.reset();
    }
}

impl Default for FilterStage {
    fn default() -> Self {
        Self::new()
    }
}
