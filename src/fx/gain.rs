//! Final volume stage, applied after every other effect so loudness control
//! is independent of effect coloration.
//!
//! A step change in gain produces an audible click, so the stage ramps
//! linearly from the previously applied value to the new target over the
//! first samples of the block. The very first block after construction (or
//! reset) snaps instead: a volume set before playback starts must apply from
//! sample zero.

/// Ramp length for a gain change. Around 1.3 ms at 48 kHz, short enough to
/// feel immediate, long enough to avoid the click.
const RAMP_SAMPLES: usize = 64;

pub struct GainStage {
    /// Gain applied at the end of the previous block. None until the first
    /// block has been processed.
    current: Option<f32>,
}

impl GainStage {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn render(&mut self, buf: &mut [f32], target: f32) {
        if buf.is_empty() {
            return;
        }
        let start = self.current.unwrap_or(target);

        if start == target {
            for sample in buf.iter_mut() {
                *sample *= target;
            }
        } else {
            let ramp_len = buf.len().min(RAMP_SAMPLES);
            let step = (target - start) / ramp_len as f32;
            let (ramp, tail) = buf.split_at_mut(ramp_len);

            let mut gain = start;
            for sample in ramp.iter_mut() {
                gain += step;
                *sample *= gain;
            }
            for sample in tail.iter_mut() {
                *sample *= target;
            }
        }

        self.current = Some(target);
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}

impl Default for GainStage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unity_gain_is_identity() {
        let mut stage = GainStage::new();
        let input: Vec<f32> = (0..128).map(|n| ((n as f32) * 0.3).sin()).collect();
        let mut buf = input.clone();

        stage.render(&mut buf, 1.0);
        assert_eq!(buf, input);
    }

    #[test]
    fn zero_gain_silences_from_the_first_sample() {
        let mut stage = GainStage::new();
        let mut buf = vec![1.0; 256];

        stage.render(&mut buf, 0.0);
        assert!(buf.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn steady_gain_scales_exactly() {
        let mut stage = GainStage::new();
        let mut buf = vec![1.0; 512];

        stage.render(&mut buf, 0.5);
        assert!(buf.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn gain_change_ramps_instead_of_stepping() {
        let mut stage = GainStage::new();
        let mut first = vec![1.0; 128];
        stage.render(&mut first, 1.0);

        let mut second = vec![1.0; 128];
        stage.render(&mut second, 0.0);

        // First sample moves off 1.0 but nowhere near the target yet.
        assert!(second[0] < 1.0 && second[0] > 0.9);
        // By the end of the ramp the block sits at the target.
        assert_eq!(second[RAMP_SAMPLES], 0.0);
        // Monotonic descent over the ramp.
        assert!(second[..RAMP_SAMPLES].windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn short_blocks_complete_the_ramp_within_the_block() {
        let mut stage = GainStage::new();
        let mut first = vec![1.0; 8];
        stage.render(&mut first, 1.0);

        let mut second = vec![1.0; 8];
        stage.render(&mut second, 0.5);
        assert!((second[7] - 0.5).abs() < 1.0e-6);
    }
}
