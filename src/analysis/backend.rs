// Feature backends - the numerical primitives behind FeatureExtractor
//
// A backend turns a path into a waveform and a waveform into per-frame
// series. Averaging and validation belong to the extractor, so swapping the
// numerical library only means implementing this trait.

use std::path::Path;

use crate::analysis::features::{
    LogMelSpectrogram, MfccProcessor, SpectralFeatures, TemporalFeatures,
};
use crate::analysis::onset::OnsetStrength;
use crate::analysis::tempo::{TempoCandidate, TempoEstimator};
use crate::audio;
use crate::config::ExtractorConfig;
use crate::error::{ComputationError, DecodeError};

/// Every per-frame series of one waveform
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSeries {
    /// Ranked tempo hypotheses, best first
    pub tempo: Vec<TempoCandidate>,
    pub rms: Vec<f32>,
    pub mfcc: Vec<Vec<f32>>,
    pub centroid: Vec<f32>,
    pub zcr: Vec<f32>,
}

/// Decoding and per-frame feature primitives
pub trait FeatureBackend {
    /// Load `path` as a mono waveform at `sample_rate`
    fn decode(&self, path: &Path, sample_rate: u32) -> Result<Vec<f32>, DecodeError>;

    /// Ranked tempo hypotheses for the waveform, best first
    fn tempo_of(&self, waveform: &[f32]) -> Vec<TempoCandidate>;

    /// RMS energy per frame
    fn rms_of(&self, waveform: &[f32]) -> Vec<f32>;

    /// MFCC vector per frame
    fn mfcc_of(&self, waveform: &[f32]) -> Vec<Vec<f32>>;

    /// Spectral centroid (Hz) per frame
    fn centroid_of(&self, waveform: &[f32]) -> Vec<f32>;

    /// Zero-crossing rate per frame
    fn zcr_of(&self, waveform: &[f32]) -> Vec<f32>;

    /// All series at once
    ///
    /// Backends whose features share intermediate results override this to
    /// compute them once.
    fn series_of(&self, waveform: &[f32]) -> FrameSeries {
        FrameSeries {
            tempo: self.tempo_of(waveform),
            rms: self.rms_of(waveform),
            mfcc: self.mfcc_of(waveform),
            centroid: self.centroid_of(waveform),
            zcr: self.zcr_of(waveform),
        }
    }
}

/// Default backend built on symphonia, rubato and rustfft
pub struct DspBackend {
    log_mel: LogMelSpectrogram,
    temporal: TemporalFeatures,
    spectral: SpectralFeatures,
    mfcc: MfccProcessor,
    onset: OnsetStrength,
    tempo: TempoEstimator,
}

impl DspBackend {
    /// Build every processor for `config`
    ///
    /// # Errors
    /// `ComputationError::InvalidConfig` when the parameters are inconsistent
    pub fn new(config: &ExtractorConfig) -> Result<Self, ComputationError> {
        config.validate()?;

        Ok(Self {
            log_mel: LogMelSpectrogram::new(
                config.sample_rate,
                config.n_fft,
                config.hop_length,
                config.n_mels,
                config.top_db,
            ),
            temporal: TemporalFeatures::new(config.frame_length, config.hop_length),
            spectral: SpectralFeatures::new(config.sample_rate, config.n_fft),
            mfcc: MfccProcessor::new(config.n_mels, config.n_mfcc),
            onset: OnsetStrength::new(config.n_fft, config.hop_length),
            tempo: TempoEstimator::new(
                config.sample_rate,
                config.hop_length,
                config.tempo.clone(),
            ),
        })
    }
}

impl FeatureBackend for DspBackend {
    fn decode(&self, path: &Path, sample_rate: u32) -> Result<Vec<f32>, DecodeError> {
        audio::load(path, sample_rate)
    }

    fn tempo_of(&self, waveform: &[f32]) -> Vec<TempoCandidate> {
        let log_mel = self.log_mel.compute(waveform);
        self.tempo.estimate(&self.onset.envelope(&log_mel))
    }

    fn rms_of(&self, waveform: &[f32]) -> Vec<f32> {
        self.temporal.rms_frames(waveform)
    }

    fn mfcc_of(&self, waveform: &[f32]) -> Vec<Vec<f32>> {
        self.mfcc.mfcc_frames(&self.log_mel.compute(waveform))
    }

    fn centroid_of(&self, waveform: &[f32]) -> Vec<f32> {
        let magnitude = self.log_mel.stft().magnitude_spectrogram(waveform);
        self.spectral.centroid_frames(&magnitude)
    }

    fn zcr_of(&self, waveform: &[f32]) -> Vec<f32> {
        self.temporal.zcr_frames(waveform)
    }

    /// One STFT and one log-mel spectrogram feed centroid, MFCC and tempo
    fn series_of(&self, waveform: &[f32]) -> FrameSeries {
        let magnitude = self.log_mel.stft().magnitude_spectrogram(waveform);
        let log_mel = self.log_mel.compute_from_magnitude(&magnitude);

        FrameSeries {
            tempo: self.tempo.estimate(&self.onset.envelope(&log_mel)),
            rms: self.temporal.rms_frames(waveform),
            mfcc: self.mfcc.mfcc_frames(&log_mel),
            centroid: self.spectral.centroid_frames(&magnitude),
            zcr: self.temporal.zcr_frames(waveform),
        }
    }
}
