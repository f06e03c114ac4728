// Spectral module - Frequency-domain feature extraction
//
// This module computes spectral features from magnitude spectra.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

/// Spectral feature computation functions
pub struct SpectralFeatures {
    sample_rate: u32,
    fft_size: usize,
}

impl SpectralFeatures {
    /// Create a new spectral features processor
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - FFT window size
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            fft_size,
        }
    }

    /// Centroid of every frame of a magnitude spectrogram
    pub fn centroid_frames(&self, spectrogram: &[Vec<f32>]) -> Vec<f32> {
        spectrogram
            .iter()
            .map(|spectrum| self.compute_centroid(spectrum))
            .collect()
    }

    /// Compute spectral centroid (weighted mean frequency)
    ///
    /// Formula: centroid = Σ(f_i × |X[i]|) / Σ|X[i]|
    ///
    /// The spectral centroid represents the "center of mass" of the spectrum,
    /// and is a measure of the brightness of a sound.
    ///
    /// # Arguments
    /// * `spectrum` - Magnitude spectrum
    ///
    /// # Returns
    /// Spectral centroid in Hz (0.0 for silent frames)
    pub fn compute_centroid(&self, spectrum: &[f32]) -> f32 {
        let freq_bin_width = self.sample_rate as f64 / self.fft_size as f64;

        let (weighted_sum, magnitude_sum) = spectrum.iter().enumerate().fold(
            (0.0f64, 0.0f64),
            |(weighted, total), (i, &mag)| {
                let freq = i as f64 * freq_bin_width;
                (weighted + freq * mag as f64, total + mag as f64)
            },
        );

        if magnitude_sum > 1e-10 {
            (weighted_sum / magnitude_sum) as f32
        } else {
            0.0
        }
    }
}
