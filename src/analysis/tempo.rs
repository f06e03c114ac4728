// TempoEstimator - global tempo from an onset envelope
//
// Algorithm:
// 1. Autocorrelation tempogram: for every onset frame, take a Hann-windowed
//    excerpt of `win_length` frames centred on it and autocorrelate it
//    (via FFT); normalise each frame by its lag-0 peak
// 2. Average the tempogram over time
// 3. Weight each lag by a log-normal prior over BPM centred on `start_bpm`
//    with a width of `std_bpm` octaves; lags at or above `max_tempo` are out
// 4. Rank lags by log1p(1e6 × tempogram) + log prior
//
// Lag L (in frames) corresponds to 60 × sample_rate / (hop_length × L) BPM.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analysis::features::fft::hann_window;
use crate::config::TempoConfig;

/// One tempo hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoCandidate {
    /// Tempo in beats per minute
    pub bpm: f32,
    /// Prior-weighted tempogram score (higher is better)
    pub score: f32,
}

/// Autocorrelation-based tempo estimator
pub struct TempoEstimator {
    sample_rate: u32,
    hop_length: usize,
    config: TempoConfig,
    window: Vec<f32>,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    ac_size: usize,
}

impl TempoEstimator {
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `hop_length` - Samples per onset frame
    /// * `config` - Prior and window parameters
    pub fn new(sample_rate: u32, hop_length: usize, config: TempoConfig) -> Self {
        let win_length = config.win_length.max(2);
        // Zero padding to at least 2N - 1 avoids circular wrap-around
        let ac_size = (2 * win_length - 1).next_power_of_two();
        let mut planner = FftPlanner::new();

        Self {
            sample_rate,
            hop_length,
            window: hann_window(win_length),
            forward: planner.plan_fft_forward(ac_size),
            inverse: planner.plan_fft_inverse(ac_size),
            ac_size,
            config: TempoConfig {
                win_length,
                ..config
            },
        }
    }

    /// BPM represented by an autocorrelation lag (in frames)
    pub fn lag_to_bpm(&self, lag: usize) -> f32 {
        if lag == 0 {
            return f32::INFINITY;
        }
        (60.0 * self.sample_rate as f64 / (self.hop_length as f64 * lag as f64)) as f32
    }

    /// Rank tempo hypotheses for an onset envelope, best first
    ///
    /// Always returns at least one candidate for a non-empty envelope: with
    /// no rhythmic evidence the prior alone decides.
    pub fn estimate(&self, onset_envelope: &[f32]) -> Vec<TempoCandidate> {
        if onset_envelope.is_empty() {
            return Vec::new();
        }

        let tempogram = self.mean_tempogram(onset_envelope);

        let mut candidates: Vec<TempoCandidate> = (1..tempogram.len())
            .filter_map(|lag| {
                let bpm = self.lag_to_bpm(lag);
                if bpm >= self.config.max_tempo {
                    return None;
                }
                let evidence = (1.0 + 1e6 * tempogram[lag].max(0.0) as f64).ln();
                let score = evidence + self.log_prior(bpm);
                Some(TempoCandidate {
                    bpm,
                    score: score as f32,
                })
            })
            .collect();

        // Stable sort keeps the shorter lag (faster tempo) first on ties
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates
    }

    /// Log-normal prior over tempo, in natural-log units
    fn log_prior(&self, bpm: f32) -> f64 {
        let octaves = (bpm as f64).log2() - (self.config.start_bpm as f64).log2();
        -0.5 * (octaves / self.config.std_bpm as f64).powi(2)
    }

    /// Autocorrelation tempogram averaged over time (one value per lag)
    pub fn mean_tempogram(&self, onset_envelope: &[f32]) -> Vec<f32> {
        let win_length = self.config.win_length;
        let n_frames = onset_envelope.len();
        let padded = ramp_pad(onset_envelope, win_length / 2);

        let mut sum = vec![0.0f64; win_length];
        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.ac_size];

        for t in 0..n_frames {
            let excerpt = &padded[t..t + win_length];

            buffer.fill(Complex::new(0.0, 0.0));
            for ((slot, &x), &w) in buffer.iter_mut().zip(excerpt).zip(&self.window) {
                *slot = Complex::new(x * w, 0.0);
            }

            self.forward.process(&mut buffer);
            for value in buffer.iter_mut() {
                *value = Complex::new(value.norm_sqr(), 0.0);
            }
            self.inverse.process(&mut buffer);

            // rustfft leaves the inverse unnormalised; lag-0 normalisation cancels it
            let peak = buffer[0].re;
            if peak <= f32::MIN_POSITIVE {
                continue;
            }
            for (acc, value) in sum.iter_mut().zip(&buffer[..win_length]) {
                *acc += (value.re / peak) as f64;
            }
        }

        sum.iter().map(|&v| (v / n_frames as f64) as f32).collect()
    }
}

/// Pad both ends with a linear ramp from 0 to the edge value
fn ramp_pad(signal: &[f32], pad: usize) -> Vec<f32> {
    let first = signal.first().copied().unwrap_or(0.0);
    let last = signal.last().copied().unwrap_or(0.0);
    let mut padded = Vec::with_capacity(signal.len() + 2 * pad);

    padded.extend((0..pad).map(|i| first * i as f32 / pad as f32));
    padded.extend_from_slice(signal);
    padded.extend((0..pad).map(|j| last * (pad - 1 - j) as f32 / pad as f32));
    // Odd windows need one more trailing sample
    padded.resize(signal.len() + 2 * pad + 1, 0.0);
    padded
}
