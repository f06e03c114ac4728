// Frame-level DSP features
//
// This module computes per-frame audio descriptors from time-domain and
// frequency-domain representations of a waveform. Averaging over frames is
// left to the extractor.
//
// Module organization:
// - framing: Centred, padded frame iteration
// - fft: STFT with Hann windowing
// - temporal: Time-domain features (RMS, ZCR)
// - spectral: Frequency-domain features (centroid)
// - mel: Mel filterbank, dB scaling and the shared log-mel spectrogram
// - mfcc: Cepstral coefficients over log-mel spectra
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

pub mod fft;
pub mod framing;
pub mod mel;
pub mod mfcc;
pub mod spectral;
pub mod temporal;

pub use fft::StftProcessor;
pub use mel::{LogMelSpectrogram, MelFilterBank};
pub use mfcc::MfccProcessor;
pub use spectral::SpectralFeatures;
pub use temporal::TemporalFeatures;

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate pure sine wave for testing
    fn generate_sine_wave(sample_rate: u32, frequency: f32, duration_samples: usize) -> Vec<f32> {
        (0..duration_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }

    /// Generate white noise for testing
    fn generate_white_noise(duration_samples: usize) -> Vec<f32> {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        (0..duration_samples)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect()
    }

    fn mean(values: &[f32]) -> f32 {
        values.iter().sum::<f32>() / values.len() as f32
    }

    #[test]
    fn test_centroid_low_vs_high_frequency() {
        let sample_rate = 16_000;
        let stft = StftProcessor::new(2048, 512);
        let spectral = SpectralFeatures::new(sample_rate, 2048);

        let low = generate_sine_wave(sample_rate, 200.0, 16_000);
        let high = generate_sine_wave(sample_rate, 5000.0, 16_000);

        let low_centroid = mean(&spectral.centroid_frames(&stft.magnitude_spectrogram(&low)));
        let high_centroid = mean(&spectral.centroid_frames(&stft.magnitude_spectrogram(&high)));

        println!("200 Hz centroid: {} Hz, 5000 Hz centroid: {} Hz", low_centroid, high_centroid);
        assert!(low_centroid < 800.0, "got {}", low_centroid);
        assert!(high_centroid > 4000.0, "got {}", high_centroid);
    }

    #[test]
    fn test_zcr_sine_vs_noise() {
        let temporal = TemporalFeatures::new(2048, 512);

        // Low-frequency sine wave (100 Hz) should have low ZCR
        let sine_zcr = mean(&temporal.zcr_frames(&generate_sine_wave(16_000, 100.0, 16_000)));

        // White noise should have high ZCR (around 0.5 for random noise)
        let noise_zcr = mean(&temporal.zcr_frames(&generate_white_noise(16_000)));

        println!("Sine (100 Hz) ZCR: {}, white noise ZCR: {}", sine_zcr, noise_zcr);
        assert!(noise_zcr > 0.3, "Expected noise ZCR > 0.3, got {}", noise_zcr);
        assert!(sine_zcr < 0.1, "Expected sine ZCR < 0.1, got {}", sine_zcr);
    }

    #[test]
    fn test_noise_is_brighter_than_low_sine() {
        let stft = StftProcessor::new(2048, 512);
        let spectral = SpectralFeatures::new(16_000, 2048);

        let sine = generate_sine_wave(16_000, 300.0, 16_000);
        let noise = generate_white_noise(16_000);

        let sine_centroid = mean(&spectral.centroid_frames(&stft.magnitude_spectrogram(&sine)));
        let noise_centroid = mean(&spectral.centroid_frames(&stft.magnitude_spectrogram(&noise)));

        // White noise centroid sits near a quarter of the sample rate
        assert!(noise_centroid > 3000.0, "got {}", noise_centroid);
        assert!(noise_centroid > sine_centroid);
    }
}
