// Analysis module - whole-file feature extraction pipeline
//
// This module turns one audio file into a single FeatureRecord: decode once,
// compute every per-frame series from the same waveform, average them, and
// refuse to return anything that is not finite.
//
// Architecture:
// - FeatureBackend: decoding and per-frame primitives (DspBackend by default)
// - FeatureExtractor: decode → tempo/RMS/MFCC/centroid/ZCR → means → record
// - Output: FeatureRecord, serialized by the CLI as one JSON object

use std::path::Path;
use std::time::Instant;

use log::debug;

pub mod backend;
pub mod features;
pub mod onset;
pub mod record;
pub mod tempo;

pub use backend::{DspBackend, FeatureBackend, FrameSeries};
pub use record::FeatureRecord;
pub use tempo::TempoCandidate;

use crate::config::{ExtractorConfig, DEFAULT_SAMPLE_RATE};
use crate::error::{ComputationError, ExtractError};

/// Computes a FeatureRecord from an audio file or a waveform
pub struct FeatureExtractor<B: FeatureBackend = DspBackend> {
    backend: B,
    sample_rate: u32,
}

impl FeatureExtractor<DspBackend> {
    /// Create an extractor with the DSP backend for `config`
    ///
    /// # Errors
    /// `ComputationError::InvalidConfig` when the parameters are inconsistent
    pub fn new(config: ExtractorConfig) -> Result<Self, ComputationError> {
        let backend = DspBackend::new(&config)?;
        Ok(Self::with_backend(backend, config.sample_rate))
    }
}

impl<B: FeatureBackend> FeatureExtractor<B> {
    /// Create an extractor around any backend
    ///
    /// # Arguments
    /// * `backend` - Decoding and per-frame primitives
    /// * `sample_rate` - Rate the backend decodes to and analyses at
    pub fn with_backend(backend: B, sample_rate: u32) -> Self {
        Self {
            backend,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Decode `path` and compute its features
    pub fn extract(&self, path: &Path) -> Result<FeatureRecord, ExtractError> {
        let start = Instant::now();
        let waveform = self.backend.decode(path, self.sample_rate)?;
        debug!(
            "[Extract] decoded {} samples at {} Hz in {:?}",
            waveform.len(),
            self.sample_rate,
            start.elapsed()
        );

        let record = self.extract_waveform(&waveform)?;
        debug!("[Extract] {} done in {:?}", path.display(), start.elapsed());
        Ok(record)
    }

    /// Compute features of an already decoded mono waveform
    ///
    /// # Errors
    /// - `EmptyWaveform` if there are no samples
    /// - `NonFinite` if any feature is NaN or infinite
    pub fn extract_waveform(&self, waveform: &[f32]) -> Result<FeatureRecord, ComputationError> {
        if waveform.is_empty() {
            return Err(ComputationError::EmptyWaveform);
        }

        let series = self.backend.series_of(waveform);
        let tempo = series
            .tempo
            .first()
            .map(|candidate| candidate.bpm)
            .ok_or_else(|| ComputationError::NonFinite {
                feature: "tempo".to_string(),
            })?;
        debug!(
            "[Extract] tempo {:.2} BPM ({} candidates)",
            tempo,
            series.tempo.len()
        );

        let rms = mean(&series.rms);
        let mfcc = column_means(&series.mfcc);
        let spectral_centroid = mean(&series.centroid);
        let zero_crossing_rate = mean(&series.zcr);
        debug!(
            "[Extract] rms={:.4} centroid={:.1} Hz zcr={:.4} mfcc[0]={:.2}",
            rms,
            spectral_centroid,
            zero_crossing_rate,
            mfcc.first().copied().unwrap_or(f32::NAN)
        );

        let record = FeatureRecord {
            tempo,
            rms,
            mfcc,
            spectral_centroid,
            zero_crossing_rate,
        };
        record.ensure_finite()?;
        Ok(record)
    }
}

/// Extract features from `path` at the default 16 kHz analysis rate
pub fn extract(path: impl AsRef<Path>) -> Result<FeatureRecord, ExtractError> {
    extract_at(path, DEFAULT_SAMPLE_RATE)
}

/// Extract features from `path` analysed at `sample_rate`
pub fn extract_at(
    path: impl AsRef<Path>,
    sample_rate: u32,
) -> Result<FeatureRecord, ExtractError> {
    let extractor = FeatureExtractor::new(ExtractorConfig::with_sample_rate(sample_rate))?;
    extractor.extract(path.as_ref())
}

/// Arithmetic mean of a per-frame series (NaN when empty)
fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return f32::NAN;
    }
    (values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64) as f32
}

/// Per-coefficient mean over frames
fn column_means(frames: &[Vec<f32>]) -> Vec<f32> {
    let width = frames.first().map_or(0, Vec::len);
    let mut sums = vec![0.0f64; width];

    for frame in frames {
        for (sum, &value) in sums.iter_mut().zip(frame) {
            *sum += value as f64;
        }
    }

    sums.iter()
        .map(|&sum| (sum / frames.len() as f64) as f32)
        .collect()
}
