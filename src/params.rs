//! Lock-free parameter exchange between the control path and the audio path.
//!
//! The control side (UI, host bindings, MIDI mapping) writes parameters at
//! arbitrary times; the audio callback snapshots them once per block. Floats
//! are stored as `AtomicU32` bit patterns so a field can never be read torn,
//! and neither side ever takes a lock or blocks the other.
//!
//! Range validation lives here: every setter clamps into the physically
//! sensible range and publishes the clamped value. Out-of-range input is not
//! an error on a realtime control surface, it is just pinned to the bound.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pitch bend range, +/- one octave.
pub const PITCH_SEMITONE_RANGE: f32 = 12.0;
/// Flanger LFO rate bounds in Hz (control-rate territory).
pub const FLANGER_RATE_HZ: (f32, f32) = (0.01, 10.0);
/// Filter cutoff floor. The per-block Nyquist ceiling is applied by the
/// filter stage, which knows the actual sample rate.
pub const CUTOFF_HZ: (f32, f32) = (20.0, 20_000.0);
/// Resonance as a Q value. 0.7 is roughly Butterworth; 10 rings hard but
/// stays stable with the SVF's damping mapping.
pub const RESONANCE_Q: (f32, f32) = (0.1, 10.0);
/// Jog wheel displacement bounds, expressed as a playback-rate offset.
/// 0 = platter at rest (nominal speed), -2 = full reverse at nominal speed.
pub const JOG_RANGE: f32 = 8.0;
/// Volume ceiling: 2x allows controlled headroom above unity.
pub const VOLUME_MAX: f32 = 2.0;

/// One consistent parameter snapshot, taken once per processed block.
///
/// Cross-field atomicity is deliberately not guaranteed (a snapshot may mix
/// a new cutoff with an old resonance); each individual field is always a
/// whole, valid, clamped value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    pub pitch_semitones: f32,
    pub flanger_enabled: bool,
    pub flanger_rate_hz: f32,
    pub flanger_depth: f32,
    pub filter_cutoff_hz: f32,
    pub filter_resonance: f32,
    pub jog_position: f32,
    pub volume: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            pitch_semitones: 0.0,
            flanger_enabled: false,
            flanger_rate_hz: 0.5,
            flanger_depth: 0.5,
            filter_cutoff_hz: CUTOFF_HZ.1,
            filter_resonance: 0.7,
            jog_position: 0.0,
            volume: 1.0,
        }
    }
}

/// An `f32` published through an `AtomicU32` bit pattern.
///
/// A plain `f32` shared across threads could in principle be read half-old,
/// half-new; round-tripping through `to_bits`/`from_bits` makes every load
/// observe exactly one store.
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Shared parameter store: one writer role (control), one reader role (audio).
///
/// Wrap it in an `Arc` and hand clones to the control side; the engine keeps
/// its own clone and calls [`snapshot`](Self::snapshot) at the top of every
/// block. All setters clamp first, then publish with a single atomic store.
pub struct ParamStore {
    pitch_semitones: AtomicF32,
    flanger_enabled: AtomicBool,
    flanger_rate_hz: AtomicF32,
    flanger_depth: AtomicF32,
    filter_cutoff_hz: AtomicF32,
    filter_resonance: AtomicF32,
    jog_position: AtomicF32,
    volume: AtomicF32,
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamStore {
    pub fn new() -> Self {
        let d = EffectParams::default();
        Self {
            pitch_semitones: AtomicF32::new(d.pitch_semitones),
            flanger_enabled: AtomicBool::new(d.flanger_enabled),
            flanger_rate_hz: AtomicF32::new(d.flanger_rate_hz),
            flanger_depth: AtomicF32::new(d.flanger_depth),
            filter_cutoff_hz: AtomicF32::new(d.filter_cutoff_hz),
            filter_resonance: AtomicF32::new(d.filter_resonance),
            jog_position: AtomicF32::new(d.jog_position),
            volume: AtomicF32::new(d.volume),
        }
    }

    /// Clamp a raw control value, substituting the fallback for NaN so the
    /// audio side always sees a finite number.
    #[inline]
    fn sanitize(value: f32, lo: f32, hi: f32, fallback: f32) -> f32 {
        if value.is_nan() {
            fallback
        } else {
            value.clamp(lo, hi)
        }
    }

    pub fn set_pitch_bend(&self, semitones: f32) {
        self.pitch_semitones.store(Self::sanitize(
            semitones,
            -PITCH_SEMITONE_RANGE,
            PITCH_SEMITONE_RANGE,
            0.0,
        ));
    }

    pub fn set_flanger_enabled(&self, enabled: bool) {
        self.flanger_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn set_flanger_rate(&self, rate_hz: f32) {
        self.flanger_rate_hz
            .store(Self::sanitize(rate_hz, FLANGER_RATE_HZ.0, FLANGER_RATE_HZ.1, 0.5));
    }

    pub fn set_flanger_depth(&self, depth: f32) {
        self.flanger_depth
            .store(Self::sanitize(depth, 0.0, 1.0, 0.5));
    }

    pub fn set_filter_cutoff(&self, cutoff_hz: f32) {
        self.filter_cutoff_hz
            .store(Self::sanitize(cutoff_hz, CUTOFF_HZ.0, CUTOFF_HZ.1, CUTOFF_HZ.1));
    }

    pub fn set_filter_resonance(&self, q: f32) {
        self.filter_resonance
            .store(Self::sanitize(q, RESONANCE_Q.0, RESONANCE_Q.1, 0.7));
    }

    pub fn set_jog_position(&self, position: f32) {
        self.jog_position
            .store(Self::sanitize(position, -JOG_RANGE, JOG_RANGE, 0.0));
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume.store(Self::sanitize(volume, 0.0, VOLUME_MAX, 1.0));
    }

    // Read-back accessors return the published (clamped) value, not the raw
    // input, so the control surface can display what the engine actually uses.

    pub fn pitch_bend(&self) -> f32 {
        self.pitch_semitones.load()
    }

    pub fn flanger_enabled(&self) -> bool {
        self.flanger_enabled.load(Ordering::Relaxed)
    }

    pub fn flanger_rate(&self) -> f32 {
        self.flanger_rate_hz.load()
    }

    pub fn flanger_depth(&self) -> f32 {
        self.flanger_depth.load()
    }

    pub fn filter_cutoff(&self) -> f32 {
        self.filter_cutoff_hz.load()
    }

    pub fn filter_resonance(&self) -> f32 {
        self.filter_resonance.load()
    }

    pub fn jog_position(&self) -> f32 {
        self.jog_position.load()
    }

    pub fn volume(&self) -> f32 {
        self.volume.load()
    }

    /// Snapshot every field for one processing call. Wait-free: eight atomic
    /// loads, no loop, no lock.
    pub fn snapshot(&self) -> EffectParams {
        EffectParams {
            pitch_semitones: self.pitch_semitones.load(),
            flanger_enabled: self.flanger_enabled.load(Ordering::Relaxed),
            flanger_rate_hz: self.flanger_rate_hz.load(),
            flanger_depth: self.flanger_depth.load(),
            filter_cutoff_hz: self.filter_cutoff_hz.load(),
            filter_resonance: self.filter_resonance.load(),
            jog_position: self.jog_position.load(),
            volume: self.volume.load(),
        }
    }
}
