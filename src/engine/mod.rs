//! Pipeline orchestrator: owns the effect stages, the shared parameter
//! store, and the Uninitialized/Ready state machine.
//!
//! Setup is explicit: [`Engine::new`] never fails and allocates nothing on
//! the processing path; [`Engine::prepare`] performs every allocation once
//! and surfaces failure once. After that, [`Engine::process_block`] and the
//! parameter setters interleave freely until the engine is dropped: one
//! parameter snapshot per block, then varispeed, flanger, filter, and gain
//! in fixed order.
//!
//! Concurrency contract: the engine itself lives on the audio side and is
//! `&mut` per call; the only state shared with the control side is the
//! [`ParamStore`] (atomic fields) and the event sink's ring. Nothing on the
//! processing path blocks, locks, or allocates.

pub mod events;

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::fx::filter::FilterStage;
use crate::fx::flanger::Flanger;
use crate::fx::gain::GainStage;
use crate::fx::varispeed::{playback_rate, Varispeed};
use crate::fx::{BlockCtx, Interpolation};
use crate::params::ParamStore;
use crate::MAX_BLOCK_SIZE;

use self::events::{EventSink, FaultEvent, NullSink};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Nominal sample rate; sizes internal buffers. `process_block` accepts
    /// the actual per-call rate.
    pub sample_rate: f32,
    /// Largest block a single call may carry.
    pub max_block_size: usize,
    /// Seconds of playback history kept for slow/reverse jog playback.
    pub history_seconds: f32,
    /// Interpolation quality for varispeed reads.
    pub interpolation: Interpolation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_block_size: MAX_BLOCK_SIZE,
            history_seconds: 4.0,
            interpolation: Interpolation::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialized,
    Ready,
}

pub struct Engine {
    config: EngineConfig,
    state: State,
    params: Arc<ParamStore>,
    varispeed: Varispeed,
    flanger: Flanger,
    filter: FilterStage,
    gain: GainStage,
    events: Box<dyn EventSink>,
}

impl Engine {
    /// Create an engine in the Uninitialized state. Infallible: no buffers
    /// are allocated until [`prepare`](Self::prepare).
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: State::Uninitialized,
            params: Arc::new(ParamStore::new()),
            varispeed: Varispeed::new(config.interpolation),
            flanger: Flanger::new(),
            filter: FilterStage::new(),
            gain: GainStage::new(),
            events: Box::new(NullSink),
            config,
        }
    }

    /// Install a sink for fault events. Replaces the default discarding sink.
    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.events = sink;
    }

    /// One-time Uninitialized -> Ready transition. Validates the config and
    /// performs every allocation the processing path will ever need. Must
    /// complete before the first `process_block`; not safe to call
    /// concurrently with one.
    pub fn prepare(&mut self) -> Result<(), EngineError> {
        let cfg = self.config;
        if !(cfg.sample_rate.is_finite() && cfg.sample_rate > 0.0) {
            return Err(EngineError::InvalidSampleRate(cfg.sample_rate));
        }
        if cfg.max_block_size == 0 || cfg.max_block_size > MAX_BLOCK_SIZE {
            return Err(EngineError::InvalidBlockSize {
                got: cfg.max_block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        if !(cfg.history_seconds.is_finite() && cfg.history_seconds > 0.0) {
            return Err(EngineError::InvalidHistoryLength(cfg.history_seconds));
        }

        let history = (cfg.history_seconds * cfg.sample_rate) as usize;
        self.varispeed.prepare(history.max(2 * cfg.max_block_size))?;
        self.flanger.prepare(cfg.sample_rate)?;
        self.filter.reset();
        self.gain.reset();

        self.state = State::Ready;
        Ok(())
    }

    /// Whether internal buffers are allocated and processing may begin.
    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    /// Shared handle for the control side. Clamped setters on the store are
    /// safe to call from any thread, concurrently with processing.
    pub fn params(&self) -> Arc<ParamStore> {
        Arc::clone(&self.params)
    }

    // Convenience setters mirroring the host-facing control surface; each
    // delegates to the store's clamping setter.

    pub fn set_pitch_bend(&self, semitones: f32) {
        self.params.set_pitch_bend(semitones);
    }

    pub fn set_flanger_enabled(&self, enabled: bool) {
        self.params.set_flanger_enabled(enabled);
    }

    pub fn set_flanger_rate(&self, rate_hz: f32) {
        self.params.set_flanger_rate(rate_hz);
    }

    pub fn set_flanger_depth(&self, depth: f32) {
        self.params.set_flanger_depth(depth);
    }

    pub fn set_filter_cutoff(&self, cutoff_hz: f32) {
        self.params.set_filter_cutoff(cutoff_hz);
    }

    pub fn set_filter_resonance(&self, q: f32) {
        self.params.set_filter_resonance(q);
    }

    pub fn set_jog_position(&self, position: f32) {
        self.params.set_jog_position(position);
    }

    pub fn set_volume(&self, volume: f32) {
        self.params.set_volume(volume);
    }

    /// Process one block in place: snapshot parameters, then varispeed ->
    /// flanger -> filter -> gain. Realtime-safe: no locks, no allocation,
    /// no early-exit paths that leave the buffer undefined.
    ///
    /// An empty block is a no-op. Calling before `prepare`, or with a block
    /// larger than the prepared maximum, is a caller contract violation: the
    /// block is silenced, a fault event is emitted, and in debug builds an
    /// assertion fires.
    pub fn process_block(&mut self, buf: &mut [f32], sample_rate: f32) {
        if buf.is_empty() {
            return;
        }
        if self.state != State::Ready {
            debug_assert!(false, "process_block before prepare()");
            buf.fill(0.0);
            self.events.push(FaultEvent::NotReady);
            return;
        }
        if buf.len() > self.config.max_block_size {
            debug_assert!(
                false,
                "block of {} exceeds prepared maximum {}",
                buf.len(),
                self.config.max_block_size
            );
            buf.fill(0.0);
            self.events.push(FaultEvent::OversizedBlock);
            return;
        }
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        } else {
            self.config.sample_rate
        };

        let p = self.params.snapshot();
        let ctx = BlockCtx { sample_rate };

        let rate = playback_rate(p.pitch_semitones, p.jog_position);
        self.varispeed.render(buf, rate);

        self.flanger
            .render(buf, &ctx, p.flanger_enabled, p.flanger_rate_hz, p.flanger_depth);

        if self
            .filter
            .render(buf, &ctx, p.filter_cutoff_hz, p.filter_resonance)
        {
            self.events.push(FaultEvent::FilterReset);
        }

        self.gain.render(buf, p.volume);
    }

    /// Clear all audio-side state (history ring, delay line, filter memory,
    /// gain ramp) without touching published parameters or the Ready state.
    pub fn reset(&mut self) {
        self.varispeed.reset();
        self.flanger.reset();
        self.filter.reset();
        self.gain.reset();
    }
}
