//! Variable-rate playback: the substrate for both pitch bend and scratching.
//!
//! Pitch bend and jog-wheel scratching are the same operation underneath: the
//! output reads the input stream at a non-nominal rate. Incoming blocks are
//! appended to a pre-allocated history ring and a fractional cursor walks the
//! ring at the combined rate, interpolating between samples. The cursor
//! persists across blocks, so rate changes glide instead of stepping at
//! buffer boundaries.
//!
//! Platter model: jog 0 is a platter at rest (nominal forward speed), positive
//! jog pushes the platter faster, jog below -1 drags playback backwards, and
//! -1 exactly stops it. Rate 0 holds the cursor, so the same interpolated
//! sample repeats; negative rates decrement the cursor through retained
//! history. The cursor is clamped into the valid ring window every sample, so
//! there is no index overrun regardless of how hard the controls are driven.

use std::collections::TryReserveError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::interp::{catmull_rom, lerp};

/// Hard bound on the combined playback rate, forward or reverse. Twelve
/// semitones up is 2x; the rest of the range belongs to the jog wheel.
pub const MAX_RATE: f64 = 8.0;

/// Ring margin kept between the cursor clamp window and the physical buffer
/// edge so the cubic kernel's outer taps always land on valid history.
const EDGE_MARGIN: u64 = 4;

/// Interpolation quality for fractional reads.
///
/// Linear is exact at integer positions, which keeps nominal-speed playback
/// bit-transparent. Cubic reduces aliasing on fast scratches.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    #[default]
    Linear,
    Cubic,
}

/// Rate multiplier for a pitch bend in semitones: 2^(s/12).
#[inline]
pub fn semitone_ratio(semitones: f32) -> f32 {
    2.0_f32.powf(semitones / 12.0)
}

/// Rate multiplier for a jog-wheel displacement. Additive around nominal
/// speed: 0 -> 1.0x, +1 -> 2.0x, -1 -> stopped, -2 -> reverse at nominal.
#[inline]
pub fn jog_factor(position: f32) -> f32 {
    1.0 + position
}

/// Combined playback rate from both controls, clamped to [`MAX_RATE`].
#[inline]
pub fn playback_rate(pitch_semitones: f32, jog_position: f32) -> f64 {
    let rate = semitone_ratio(pitch_semitones) as f64 * jog_factor(jog_position) as f64;
    rate.clamp(-MAX_RATE, MAX_RATE)
}

pub struct Varispeed {
    history: Vec<f32>,
    /// Total samples ever written; `write_abs % capacity` is the ring slot.
    write_abs: u64,
    /// Absolute fractional read position into the history stream.
    cursor: f64,
    interp: Interpolation,
}

impl Varispeed {
    pub fn new(interp: Interpolation) -> Self {
        Self {
            history: Vec::new(),
            write_abs: 0,
            cursor: 0.0,
            interp,
        }
    }

    /// Allocate `capacity` samples of playback history. More history means
    /// slow and reverse playback can lag further behind the live input before
    /// the window drags the cursor forward.
    pub fn prepare(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        let capacity = capacity.max(EDGE_MARGIN as usize * 4);
        self.history = Vec::new();
        self.history.try_reserve_exact(capacity)?;
        self.history.resize(capacity, 0.0);
        self.write_abs = 0;
        self.cursor = 0.0;
        Ok(())
    }

    #[inline]
    fn sample_at(&self, index: u64, oldest: u64, newest: u64) -> f32 {
        let idx = index.clamp(oldest, newest);
        self.history[(idx % self.history.len() as u64) as usize]
    }

    /// Append the block to the history ring, then overwrite it with samples
    /// read at `rate`. Rate 1.0 on a fresh engine is bit-transparent.
    pub fn render(&mut self, buf: &mut [f32], rate: f64) {
        if buf.is_empty() {
            return;
        }
        if self.history.is_empty() {
            buf.fill(0.0);
            return;
        }
        let cap = self.history.len() as u64;

        for &x in buf.iter() {
            self.history[(self.write_abs % cap) as usize] = x;
            self.write_abs += 1;
        }

        let newest = self.write_abs - 1;
        let oldest = self.write_abs.saturating_sub(cap - EDGE_MARGIN);
        let rate = if rate.is_finite() {
            rate.clamp(-MAX_RATE, MAX_RATE)
        } else {
            1.0
        };

        for out in buf.iter_mut() {
            self.cursor = self.cursor.clamp(oldest as f64, newest as f64);
            let whole = self.cursor as u64;
            let frac = (self.cursor - whole as f64) as f32;

            *out = match self.interp {
                Interpolation::Linear => lerp(
                    self.sample_at(whole, oldest, newest),
                    self.sample_at(whole + 1, oldest, newest),
                    frac,
                ),
                Interpolation::Cubic => catmull_rom(
                    self.sample_at(whole.saturating_sub(1), oldest, newest),
                    self.sample_at(whole, oldest, newest),
                    self.sample_at(whole + 1, oldest, newest),
                    self.sample_at(whole + 2, oldest, newest),
                    frac,
                ),
            };

            self.cursor += rate;
        }

        self.cursor = self.cursor.clamp(oldest as f64, (newest + 1) as f64);
    }

    pub fn reset(&mut self) {
        self.history.fill(0.0);
        self.write_abs = 0;
        self.cursor = 0.0;
    }
}
