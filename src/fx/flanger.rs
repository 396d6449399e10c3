//! Flanger: the dry signal mixed with a short, LFO-swept delayed copy.
//!
//! The sweeping tap creates a comb filter whose notches move up and down the
//! spectrum, the classic "jet" whoosh. The delay stays in the sub-10ms range;
//! longer taps turn the effect into chorus or slapback territory.
//!
//! Rate is the LFO speed in Hz (control-rate, well below audio). Depth scales
//! how far the tap sweeps above the minimum delay: depth 0 parks the tap at
//! the minimum, depth 1 uses the full sweep range. Disabled, the stage is a
//! bit-exact pass-through so the host can A/B it.

use std::collections::TryReserveError;
use std::f32::consts::TAU;

use crate::dsp::delay::DelayLine;
use crate::fx::BlockCtx;

/// Shortest tap. Zero would collapse the comb onto the dry signal.
const MIN_DELAY_MS: f32 = 0.5;
/// Sweep range above the minimum at depth 1.0.
const SWEEP_MS: f32 = 6.0;
/// Equal-power is overkill for a fixed 50/50 flanger blend.
const WET_MIX: f32 = 0.5;

/// Delay-line capacity headroom over the maximum modulated tap, in samples.
const CAPACITY_PAD: usize = 8;

/// Delay capacity in samples for a given sample rate.
pub fn capacity_for(sample_rate: f32) -> usize {
    ((MIN_DELAY_MS + SWEEP_MS) / 1000.0 * sample_rate) as usize + CAPACITY_PAD
}

pub struct Flanger {
    delay: DelayLine,
    lfo_phase: f32,
    was_enabled: bool,
}

impl Flanger {
    pub fn new() -> Self {
        Self {
            delay: DelayLine::new(),
            lfo_phase: 0.0,
            was_enabled: false,
        }
    }

    pub fn prepare(&mut self, sample_rate: f32) -> Result<(), TryReserveError> {
        self.delay.prepare(capacity_for(sample_rate))
    }

    /// Process one block. When disabled the buffer is untouched; on the
    /// enable edge the delay line is cleared so the sweep starts from silence
    /// instead of stale history.
    pub fn render(&mut self, buf: &mut [f32], ctx: &BlockCtx, enabled: bool, rate_hz: f32, depth: f32) {
        if !enabled {
            self.was_enabled = false;
            return;
        }
        if !self.was_enabled {
            self.delay.reset();
            self.lfo_phase = 0.0;
            self.was_enabled = true;
        }

        let sample_rate = ctx.sample_rate;
        let phase_inc = TAU * rate_hz / sample_rate;
        let depth = depth.clamp(0.0, 1.0);

        for sample in buf.iter_mut() {
            // Unipolar LFO sweeps the tap between the minimum delay and the
            // depth-scaled maximum; the delay line clamps to its capacity.
            let sweep = (self.lfo_phase.sin() + 1.0) * 0.5;
            let delay_ms = MIN_DELAY_MS + sweep * depth * SWEEP_MS;
            let delay_samples = (delay_ms * sample_rate / 1000.0).max(1.0);

            let wet = self.delay.read_interpolated(delay_samples);
            self.delay.write(*sample);

            *sample = *sample * (1.0 - WET_MIX) + wet * WET_MIX;

            self.lfo_phase += phase_inc;
            if self.lfo_phase >= TAU {
                self.lfo_phase -= TAU;
            }
        }
    }

    pub fn reset(&mut self) {
        self.delay.reset();
        self.lfo_phase = 0.0;
        self.was_enabled = false;
    }
}

impl Default for Flanger {
    fn default() -> Self {
        Self::new()
    }
}
