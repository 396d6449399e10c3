use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type              | passes          | rejects      |
| ----------------- | --------------- | ------------ |
| low-pass          | below cutoff    | above cutoff |
| high-pass         | above cutoff    | below cutoff |
| band-pass         | around cutoff   | outside      |
| notch / band-stop | outside         | around cutoff|

Topology-preserving state-variable filter (Zavalishin). One update produces
all four responses; the caller picks one. Two integrator memories carry the
filter history across block boundaries.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

/// SVF core: integrator state only. Coefficients are computed by the caller
/// (see [`coeff_g`] / [`coeff_k`]) so they can be cached and recomputed only
/// when cutoff or resonance actually changes.
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory
}

/// Frequency coefficient: bilinear-transform prewarped cutoff.
#[inline]
pub fn coeff_g(cutoff_hz: f32, sample_rate: f32) -> f32 {
    (PI * cutoff_hz / sample_rate).tan()
}

/// Damping coefficient from a Q value. k = 1/Q keeps the recurrence stable
/// for any positive Q; smaller k rings harder.
#[inline]
pub fn coeff_k(q: f32) -> f32 {
    1.0 / q
}

impl SVFilter {
    pub fn new() -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, g: f32, k: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
            notch: sample - k * v1,
        }
    }

    /// True while both integrator memories hold finite values.
    pub fn is_finite(&self) -> bool {
        self.ic1eq.is_finite() && self.ic2eq.is_finite()
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

impl Default for SVFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(filter: &mut SVFilter, input: &[f32], cutoff: f32, q: f32, shape: FilterShape) -> Vec<f32> {
        let g = coeff_g(cutoff, 48_000.0);
        let k = coeff_k(q);
        input
            .iter()
            .map(|&x| {
                let out = filter.next_sample(x, g, k);
                match shape {
                    FilterShape::LowPass => out.lowpass,
                    FilterShape::HighPass => out.highpass,
                    FilterShape::BandPass => out.bandpass,
                    FilterShape::Notch => out.notch,
                }
            })
            .collect()
    }

    #[test]
    fn lowpass_settles_to_dc_input() {
        let mut filter = SVFilter::new();
        let input = vec![1.0; 512];
        let out = run(&mut filter, &input, 500.0, 0.7, FilterShape::LowPass);
        assert!(out[511] > 0.99, "DC should pass a lowpass, got {}", out[511]);
    }

    #[test]
    fn highpass_rejects_dc_input() {
        let mut filter = SVFilter::new();
        let input = vec![1.0; 512];
        let out = run(&mut filter, &input, 500.0, 0.7, FilterShape::HighPass);
        assert!(
            out[511].abs() < 0.001,
            "DC should be blocked by a highpass, got {}",
            out[511]
        );
    }

    #[test]
    fn lowpass_attenuates_tone_above_cutoff() {
        let mut filter = SVFilter::new();
        let sample_rate = 48_000.0;
        // 5 kHz sine through a 500 Hz lowpass: ~10x above cutoff.
        let input: Vec<f32> = (0..512)
            .map(|n| (std::f32::consts::TAU * 5_000.0 * n as f32 / sample_rate).sin())
            .collect();
        let out = run(&mut filter, &input, 500.0, 0.7, FilterShape::LowPass);

        let peak = out[64..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(peak < 0.3, "expected strong attenuation, got peak {peak}");
    }

    #[test]
    fn higher_q_rings_harder_at_cutoff() {
        let sample_rate = 48_000.0;
        let cutoff = 1_000.0;
        let tone: Vec<f32> = (0..1024)
            .map(|n| (std::f32::consts::TAU * cutoff * n as f32 / sample_rate).sin())
            .collect();

        let mut low_q = SVFilter::new();
        let out_low = run(&mut low_q, &tone, cutoff, 0.5, FilterShape::LowPass);
        let peak_low = out_low[128..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));

        let mut high_q = SVFilter::new();
        let out_high = run(&mut high_q, &tone, cutoff, 5.0, FilterShape::LowPass);
        let peak_high = out_high[128..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));

        assert!(
            peak_high > peak_low * 1.5,
            "resonance should boost the cutoff tone: high={peak_high}, low={peak_low}"
        );
    }

    #[test]
    fn reset_clears_integrators() {
        let mut filter = SVFilter::new();
        let g = coeff_g(1_000.0, 48_000.0);
        let k = coeff_k(0.7);
        for _ in 0..64 {
            filter.next_sample(1.0, g, k);
        }
        filter.reset();
        assert_eq!(filter.ic1eq, 0.0);
        assert_eq!(filter.ic2eq, 0.0);
    }
}
