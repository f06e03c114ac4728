//! Analysis parameters for feature extraction
//!
//! Every numerical convention the extractor depends on (analysis sample rate,
//! frame and hop size, FFT size, mel band count, MFCC count, tempo prior) lives
//! here as a named constant and in [`ExtractorConfig`], which is passed into
//! the extractor instead of being a hidden default.

use serde::{Deserialize, Serialize};

use crate::error::ComputationError;

/// Sample rate every input is resampled to before analysis
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;
/// Frame length in samples for RMS and zero-crossing rate
pub const DEFAULT_FRAME_LENGTH: usize = 2048;
/// Samples between successive frame starts
pub const DEFAULT_HOP_LENGTH: usize = 512;
/// FFT size for spectral features
pub const DEFAULT_N_FFT: usize = 2048;
/// Mel bands used for MFCC and onset strength
pub const DEFAULT_N_MELS: usize = 128;
/// Cepstral coefficients kept per frame
pub const DEFAULT_N_MFCC: usize = 20;
/// Dynamic range kept by power-to-dB conversion
pub const DEFAULT_TOP_DB: f32 = 80.0;

/// Complete analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Target sample rate in Hz
    pub sample_rate: u32,
    /// Frame length in samples for time-domain features
    pub frame_length: usize,
    /// Hop size shared by all framed features
    pub hop_length: usize,
    /// FFT window size in samples
    pub n_fft: usize,
    /// Number of mel bands
    pub n_mels: usize,
    /// Number of MFCCs per frame
    pub n_mfcc: usize,
    /// Floor (in dB below peak) for log-mel spectra
    pub top_db: f32,
    pub tempo: TempoConfig,
}

/// Tempo estimation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoConfig {
    /// Centre of the log-normal tempo prior in BPM
    pub start_bpm: f32,
    /// Width of the tempo prior in octaves
    pub std_bpm: f32,
    /// Tempi at or above this value are never reported
    pub max_tempo: f32,
    /// Autocorrelation window in onset frames
    pub win_length: usize,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            start_bpm: 120.0,
            std_bpm: 1.0,
            max_tempo: 320.0,
            win_length: 384,
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frame_length: DEFAULT_FRAME_LENGTH,
            hop_length: DEFAULT_HOP_LENGTH,
            n_fft: DEFAULT_N_FFT,
            n_mels: DEFAULT_N_MELS,
            n_mfcc: DEFAULT_N_MFCC,
            top_db: DEFAULT_TOP_DB,
            tempo: TempoConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Default configuration analysed at a different sample rate
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Validate invariant expectations for downstream processors.
    pub fn validate(&self) -> Result<(), ComputationError> {
        let invalid = |reason: String| Err(ComputationError::InvalidConfig { reason });

        if self.sample_rate == 0 {
            return invalid("sample rate must be > 0".to_string());
        }
        if self.frame_length == 0 || self.n_fft < 2 {
            return invalid(format!(
                "frame length ({}) and FFT size ({}) must be positive",
                self.frame_length, self.n_fft
            ));
        }
        if self.hop_length == 0 || self.hop_length > self.frame_length {
            return invalid(format!(
                "hop length {} must be in 1..={}",
                self.hop_length, self.frame_length
            ));
        }
        if self.n_mels == 0 || self.n_mfcc == 0 || self.n_mfcc > self.n_mels {
            return invalid(format!(
                "need 0 < n_mfcc ({}) <= n_mels ({})",
                self.n_mfcc, self.n_mels
            ));
        }
        if !(self.top_db > 0.0) {
            return invalid(format!("top_db must be positive (got {})", self.top_db));
        }

        let tempo = &self.tempo;
        if !(tempo.start_bpm > 0.0 && tempo.std_bpm > 0.0 && tempo.max_tempo > 0.0) {
            return invalid("tempo prior parameters must be positive".to_string());
        }
        if tempo.win_length < 2 {
            return invalid(format!(
                "tempo window must span at least 2 frames (got {})",
                tempo.win_length
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.sample_rate, 16_000);
        assert_eq!(config.frame_length, 2048);
        assert_eq!(config.hop_length, 512);
        assert_eq!(config.n_mfcc, 20);
        assert_eq!(config.tempo.start_bpm, 120.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ExtractorConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: ExtractorConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_with_sample_rate_keeps_other_defaults() {
        let config = ExtractorConfig::with_sample_rate(22_050);
        assert_eq!(config.sample_rate, 22_050);
        assert_eq!(config.n_fft, DEFAULT_N_FFT);
    }

    #[test]
    fn test_validate_rejects_inconsistent_sizes() {
        let mut config = ExtractorConfig::default();
        config.n_mfcc = config.n_mels + 1;
        assert!(matches!(
            config.validate(),
            Err(ComputationError::InvalidConfig { .. })
        ));

        let mut config = ExtractorConfig::default();
        config.hop_length = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.sample_rate = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.tempo.win_length = 1;
        assert!(config.validate().is_err());
    }
}
