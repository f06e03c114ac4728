// FFT module - short-time Fourier transform
//
// This module handles framed FFT computation with Hann windowing to reduce
// spectral leakage. Magnitude spectra feed the spectral centroid; power
// spectra feed the mel filterbank.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::framing::{FramedSignal, PadMode};

/// Periodic Hann window (the DFT-even form used for spectral analysis)
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 - 0.5 * ((2.0 * std::f32::consts::PI * i as f32) / size as f32).cos())
        .collect()
}

/// STFT processor that computes per-frame spectra from a whole waveform
pub struct StftProcessor {
    fft: Arc<dyn Fft<f32>>,
    n_fft: usize,
    hop_length: usize,
    /// Hann window for FFT (pre-computed)
    window: Vec<f32>,
}

impl StftProcessor {
    /// Create a new STFT processor
    ///
    /// # Arguments
    /// * `n_fft` - FFT window size (2048 for feature extraction)
    /// * `hop_length` - Samples between frames
    pub fn new(n_fft: usize, hop_length: usize) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(n_fft);

        Self {
            fft,
            n_fft,
            hop_length,
            window: hann_window(n_fft),
        }
    }

    /// Number of frequency bins per frame (n_fft / 2 + 1)
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Magnitude spectrogram, frames × bins
    pub fn magnitude_spectrogram(&self, signal: &[f32]) -> Vec<Vec<f32>> {
        self.spectrogram(signal, |c| c.norm())
    }

    /// Power spectrogram |X|², frames × bins
    pub fn power_spectrogram(&self, signal: &[f32]) -> Vec<Vec<f32>> {
        self.spectrogram(signal, |c| c.norm_sqr())
    }

    fn spectrogram<F>(&self, signal: &[f32], scale: F) -> Vec<Vec<f32>>
    where
        F: Fn(&Complex<f32>) -> f32,
    {
        let framed = FramedSignal::new(signal, self.n_fft, self.hop_length, PadMode::Constant);
        let mut buffer = vec![Complex::new(0.0, 0.0); self.n_fft];
        let mut scratch = vec![Complex::new(0.0, 0.0); self.fft.get_inplace_scratch_len()];
        let n_bins = self.n_bins();

        framed
            .iter()
            .map(|frame| {
                for ((slot, &sample), &w) in buffer.iter_mut().zip(frame).zip(&self.window) {
                    *slot = Complex::new(sample * w, 0.0);
                }
                self.fft.process_with_scratch(&mut buffer, &mut scratch);

                // Only positive frequencies (real-valued input)
                buffer[..n_bins].iter().map(&scale).collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(sample_rate: u32, frequency: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_hann_window_is_periodic() {
        let window = hann_window(8);
        assert_eq!(window[0], 0.0);
        assert!((window[4] - 1.0).abs() < 1e-6);
        // Periodic form: symmetric around n/2, last sample is not zero
        assert!((window[1] - window[7]).abs() < 1e-6);
        assert!(window[7] > 0.0);
    }

    #[test]
    fn test_spectrogram_shape() {
        let stft = StftProcessor::new(2048, 512);
        let spec = stft.magnitude_spectrogram(&vec![0.0; 16_000]);
        assert_eq!(spec.len(), 1 + 16_000 / 512);
        assert!(spec.iter().all(|frame| frame.len() == 1025));
    }

    #[test]
    fn test_peak_bin_matches_frequency() {
        let sample_rate = 16_000;
        let stft = StftProcessor::new(2048, 512);
        // 1000 Hz falls exactly on bin 128 at 16 kHz / 2048
        let spec = stft.magnitude_spectrogram(&sine(sample_rate, 1000.0, 8192));
        let middle = &spec[spec.len() / 2];

        let (peak_bin, _) = middle
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        assert_eq!(peak_bin, 128);
    }

    #[test]
    fn test_power_is_squared_magnitude() {
        let stft = StftProcessor::new(512, 128);
        let signal = sine(16_000, 440.0, 2048);
        let magnitude = stft.magnitude_spectrogram(&signal);
        let power = stft.power_spectrogram(&signal);

        for (m_frame, p_frame) in magnitude.iter().zip(&power) {
            for (&m, &p) in m_frame.iter().zip(p_frame) {
                assert!((m * m - p).abs() <= 1e-3 * p.max(1.0));
            }
        }
    }
}
