// OnsetStrength - spectral flux onset envelope
//
// This module computes an onset-strength envelope by measuring how much the
// log-mel spectrum increases from one frame to the next. The envelope is the
// input of tempo estimation.
//
// Algorithm:
// 1. Power STFT (2048-point, hop 512, centred frames)
// 2. 128-band mel projection, converted to dB with an 80 dB floor
// 3. Positive difference from the previous frame: SF[m] = max(0, S_t[m] - S_(t-1)[m])
// 4. Mean across mel bands: onset_t = mean_m SF[m]
// 5. Shift right so each value lines up with the frame centre it describes
//
// Steps 1-2 come from LogMelSpectrogram, shared with MFCC extraction.

/// Frames between the compared spectra
const LAG: usize = 1;

/// Onset strength envelope extractor
pub struct OnsetStrength {
    /// Leading zero frames that align the envelope with frame centres
    pad_frames: usize,
}

impl OnsetStrength {
    /// # Arguments
    /// * `n_fft` - FFT size the log-mel spectrogram was computed with
    /// * `hop_length` - Samples between frames (one envelope value per hop)
    pub fn new(n_fft: usize, hop_length: usize) -> Self {
        Self {
            pad_frames: LAG + n_fft / (2 * hop_length.max(1)),
        }
    }

    /// Compute the onset envelope (one value per log-mel frame)
    pub fn envelope(&self, log_mel: &[Vec<f32>]) -> Vec<f32> {
        let n_frames = log_mel.len();
        let mut envelope = vec![0.0; self.pad_frames.min(n_frames)];

        for t in LAG..n_frames {
            if envelope.len() == n_frames {
                break;
            }
            envelope.push(compute_spectral_flux(&log_mel[t], &log_mel[t - LAG]));
        }

        envelope.resize(n_frames, 0.0);
        envelope
    }
}

/// Mean positive difference between two spectra
///
/// SF(t) = mean_m max(0, S_t[m] - S_(t-1)[m])
fn compute_spectral_flux(spectrum: &[f32], prev_spectrum: &[f32]) -> f32 {
    if spectrum.is_empty() {
        return 0.0;
    }

    let total: f32 = spectrum
        .iter()
        .zip(prev_spectrum.iter())
        .map(|(curr, prev)| (curr - prev).max(0.0))
        .sum();

    total / spectrum.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::mel::LogMelSpectrogram;

    /// Generate synthetic impulse signal for testing
    fn generate_impulse(
        sample_rate: u32,
        duration_ms: u32,
        impulse_positions: &[u32],
    ) -> Vec<f32> {
        let total_samples = (sample_rate * duration_ms / 1000) as usize;
        let mut signal = vec![0.0; total_samples];

        for &pos_ms in impulse_positions {
            let sample_idx = (sample_rate * pos_ms / 1000) as usize;
            // Create a short burst of energy (10 samples)
            for offset in 0..10 {
                if sample_idx + offset < total_samples {
                    signal[sample_idx + offset] = 1.0;
                }
            }
        }

        signal
    }

    /// Onset envelope of a waveform with the default analysis parameters
    fn onset_envelope(signal: &[f32]) -> Vec<f32> {
        let log_mel = LogMelSpectrogram::new(16_000, 2048, 512, 128, 80.0);
        OnsetStrength::new(2048, 512).envelope(&log_mel.compute(signal))
    }

    #[test]
    fn test_spectral_flux_calculation() {
        // No change should result in zero flux
        let spectrum = vec![1.0; 128];
        assert_eq!(compute_spectral_flux(&spectrum, &spectrum), 0.0);
    }

    #[test]
    fn test_spectral_flux_positive_difference() {
        let prev = vec![1.0; 128];
        let increased = vec![2.0; 128];
        let decreased = vec![0.0; 128];

        assert_eq!(compute_spectral_flux(&increased, &prev), 1.0);
        // Decreases are rectified away
        assert_eq!(compute_spectral_flux(&decreased, &prev), 0.0);
    }

    #[test]
    fn test_envelope_is_shifted_to_frame_centres() {
        // One leading zero for the lag, one for half an FFT of 2 at hop 1
        let onset = OnsetStrength::new(2, 1);
        let log_mel = vec![vec![0.0; 4], vec![0.0; 4], vec![10.0; 4], vec![10.0; 4]];

        assert_eq!(onset.envelope(&log_mel), vec![0.0, 0.0, 0.0, 10.0]);
    }

    #[test]
    fn test_envelope_length_matches_frames() {
        let envelope = onset_envelope(&vec![0.0; 16_000]);
        assert_eq!(envelope.len(), 1 + 16_000 / 512);
    }

    #[test]
    fn test_no_onsets_in_silence() {
        let envelope = onset_envelope(&vec![0.0; 16_000]);
        assert!(envelope.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_envelope_peaks_at_impulse() {
        let sample_rate = 16_000;
        let signal = generate_impulse(sample_rate, 2000, &[1000]);
        let envelope = onset_envelope(&signal);

        let (peak_frame, &peak) = envelope
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        assert!(peak > 0.0);
        let peak_ms = peak_frame as f32 * 512.0 / sample_rate as f32 * 1000.0;
        println!("Onset peak at frame {} ({:.1} ms)", peak_frame, peak_ms);
        assert!(
            (peak_ms - 1000.0).abs() < 150.0,
            "Peak at {:.1}ms, expected near 1000ms",
            peak_ms
        );
    }
}
