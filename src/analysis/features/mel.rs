// Mel module - mel filterbank, decibel scaling and log-mel spectrograms
//
// Filters follow the Slaney auditory-toolbox layout: linear below 1 kHz,
// logarithmic above, triangular filters spanning 0 Hz to Nyquist, each
// scaled to unit area (Slaney normalisation).
//
// The log-mel spectrogram is the shared front end of MFCC and onset strength.

use super::fft::StftProcessor;

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

/// ln(6.4) / 27, the log-region step of the Slaney scale
fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Convert Hz to mels (Slaney scale)
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Convert mels to Hz (Slaney scale)
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// One triangular filter stored as its non-zero span
struct MelFilter {
    start_bin: usize,
    weights: Vec<f32>,
}

/// Bank of `n_mels` triangular filters over `n_fft / 2 + 1` FFT bins
pub struct MelFilterBank {
    filters: Vec<MelFilter>,
}

impl MelFilterBank {
    /// Build the filterbank
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `n_fft` - FFT size the spectra were computed with
    /// * `n_mels` - Number of mel bands
    pub fn new(sample_rate: u32, n_fft: usize, n_mels: usize) -> Self {
        let n_bins = n_fft / 2 + 1;
        let fmax = sample_rate as f64 / 2.0;

        let fft_freqs: Vec<f64> = (0..n_bins)
            .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
            .collect();

        // n_mels + 2 band edges equally spaced on the mel axis
        let max_mel = hz_to_mel(fmax);
        let edges: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz(max_mel * i as f64 / (n_mels + 1) as f64))
            .collect();

        let filters = (0..n_mels)
            .map(|m| {
                let (lower_edge, center, upper_edge) = (edges[m], edges[m + 1], edges[m + 2]);
                let enorm = 2.0 / (upper_edge - lower_edge);

                let weights: Vec<f64> = fft_freqs
                    .iter()
                    .map(|&f| {
                        let rising = (f - lower_edge) / (center - lower_edge);
                        let falling = (upper_edge - f) / (upper_edge - center);
                        rising.min(falling).max(0.0) * enorm
                    })
                    .collect();

                let start_bin = weights.iter().position(|&w| w > 0.0).unwrap_or(0);
                let end_bin = weights
                    .iter()
                    .rposition(|&w| w > 0.0)
                    .map_or(start_bin, |last| last + 1);

                MelFilter {
                    start_bin,
                    weights: weights[start_bin..end_bin].iter().map(|&w| w as f32).collect(),
                }
            })
            .collect();

        Self { filters }
    }

    pub fn n_mels(&self) -> usize {
        self.filters.len()
    }

    /// Project one power spectrum onto the mel bands
    pub fn apply(&self, power_spectrum: &[f32]) -> Vec<f32> {
        self.filters
            .iter()
            .map(|filter| {
                let bins = power_spectrum
                    .iter()
                    .skip(filter.start_bin)
                    .take(filter.weights.len());
                bins.zip(&filter.weights).map(|(&p, &w)| p * w).sum()
            })
            .collect()
    }

    /// Mel spectrogram from a power spectrogram, frames × bands
    pub fn apply_frames(&self, power_spectrogram: &[Vec<f32>]) -> Vec<Vec<f32>> {
        power_spectrogram
            .iter()
            .map(|spectrum| self.apply(spectrum))
            .collect()
    }
}

/// Convert a power spectrogram to decibels in place
///
/// `10 × log10(max(amin, S))` relative to a reference power of 1.0, then
/// floored at `top_db` below the loudest cell of the whole spectrogram.
pub fn power_to_db(spectrogram: &mut [Vec<f32>], top_db: f32) {
    const AMIN: f32 = 1e-10;

    let mut peak = f32::NEG_INFINITY;
    for frame in spectrogram.iter_mut() {
        for value in frame.iter_mut() {
            *value = 10.0 * value.max(AMIN).log10();
            peak = peak.max(*value);
        }
    }

    let floor = peak - top_db;
    for frame in spectrogram.iter_mut() {
        for value in frame.iter_mut() {
            *value = value.max(floor);
        }
    }
}

/// Power STFT → mel projection → dB, frames × bands
pub struct LogMelSpectrogram {
    stft: StftProcessor,
    mel: MelFilterBank,
    top_db: f32,
}

impl LogMelSpectrogram {
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `n_fft` - FFT size
    /// * `hop_length` - Samples between frames
    /// * `n_mels` - Mel bands
    /// * `top_db` - Dynamic range kept below the loudest cell
    pub fn new(
        sample_rate: u32,
        n_fft: usize,
        hop_length: usize,
        n_mels: usize,
        top_db: f32,
    ) -> Self {
        Self {
            stft: StftProcessor::new(n_fft, hop_length),
            mel: MelFilterBank::new(sample_rate, n_fft, n_mels),
            top_db,
        }
    }

    /// The STFT this spectrogram is computed with
    pub fn stft(&self) -> &StftProcessor {
        &self.stft
    }

    /// Log-mel spectrogram of a waveform
    pub fn compute(&self, audio: &[f32]) -> Vec<Vec<f32>> {
        self.compute_from_power(&self.stft.power_spectrogram(audio))
    }

    /// Log-mel spectrogram from an already computed magnitude spectrogram
    pub fn compute_from_magnitude(&self, magnitude: &[Vec<f32>]) -> Vec<Vec<f32>> {
        let power: Vec<Vec<f32>> = magnitude
            .iter()
            .map(|frame| frame.iter().map(|&m| m * m).collect())
            .collect();
        self.compute_from_power(&power)
    }

    /// Log-mel spectrogram from an already computed power spectrogram
    pub fn compute_from_power(&self, power: &[Vec<f32>]) -> Vec<Vec<f32>> {
        let mut log_mel = self.mel.apply_frames(power);
        power_to_db(&mut log_mel, self.top_db);
        log_mel
    }
}
