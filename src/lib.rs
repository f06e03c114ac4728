// Audio Features - whole-file audio descriptors
// Decodes one audio file and summarises it as tempo, RMS, MFCC means,
// spectral centroid and zero-crossing rate

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use analysis::{
    extract, extract_at, DspBackend, FeatureBackend, FeatureExtractor, FeatureRecord,
    FrameSeries, TempoCandidate,
};
pub use config::{ExtractorConfig, TempoConfig, DEFAULT_SAMPLE_RATE};
pub use error::{ComputationError, DecodeError, ErrorCode, ExtractError};
