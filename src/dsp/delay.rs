//! Circular delay line with an interpolated read tap.
//!
//! Backing storage is allocated once by `prepare` (engine setup time) and
//! never resized afterwards; `write`/`read_interpolated` are allocation-free
//! and safe on the audio thread.

use std::collections::TryReserveError;

use crate::dsp::interp::lerp;

pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Create an empty delay line. Unusable until [`prepare`](Self::prepare)
    /// allocates backing storage; reads before that return silence.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            write_pos: 0,
        }
    }

    /// Allocate storage for `capacity` samples of history. Allocation failure
    /// is surfaced to the caller instead of aborting, so engine setup can
    /// report it once.
    pub fn prepare(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        self.buffer = Vec::new();
        self.buffer.try_reserve_exact(capacity)?;
        self.buffer.resize(capacity, 0.0);
        self.write_pos = 0;
        Ok(())
    }

    /// Push one input sample, advancing the write cursor.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        if self.buffer.is_empty() {
            return;
        }
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Read a tap `delay_samples` behind the most recently written sample,
    /// linearly interpolating between the two neighboring slots. The delay is
    /// clamped to the line's capacity so a modulated tap can never read ahead
    /// of the write cursor or past the oldest retained sample.
    #[inline]
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        if len < 2 {
            return 0.0;
        }

        let delay = delay_samples.clamp(1.0, (len - 2) as f32);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        // write_pos points at the slot about to be overwritten; the most
        // recent sample lives one behind it.
        let newest = (self.write_pos + len - 1) % len;
        let i0 = (newest + len - whole) % len;
        let i1 = (i0 + len - 1) % len;

        lerp(self.buffer[i0], self.buffer[i1], frac)
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_delay_recalls_written_sample() {
        let mut line = DelayLine::new();
        line.prepare(64).unwrap();

        for i in 0..32 {
            line.write(i as f32);
        }

        // Newest sample is 31; a 4-sample tap should read 27.
        assert_eq!(line.read_interpolated(4.0), 27.0);
    }

    #[test]
    fn fractional_delay_interpolates_neighbors() {
        let mut line = DelayLine::new();
        line.prepare(32).unwrap();
        for i in 0..16 {
            line.write(i as f32);
        }

        // Halfway between taps 4 (=> 11.0) and 5 (=> 10.0).
        let tap = line.read_interpolated(4.5);
        assert!((tap - 10.5).abs() < 1.0e-5);
    }

    #[test]
    fn oversized_delay_clamps_to_capacity() {
        let mut line = DelayLine::new();
        line.prepare(16).unwrap();
        for _ in 0..16 {
            line.write(1.0);
        }

        // A tap way past capacity must still read retained history, not wrap
        // into garbage or panic.
        assert_eq!(line.read_interpolated(1.0e6), 1.0);
    }

    #[test]
    fn unprepared_line_is_silent() {
        let line = DelayLine::new();
        assert_eq!(line.read_interpolated(3.0), 0.0);
    }

    #[test]
    fn reset_clears_history() {
        let mut line = DelayLine::new();
        line.prepare(8).unwrap();
        for _ in 0..8 {
            line.write(0.7);
        }
        line.reset();
        assert_eq!(line.read_interpolated(2.0), 0.0);
    }
}
