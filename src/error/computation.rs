// Computation error types and constants

use crate::error::ErrorCode;
use thiserror::Error;

/// Computation error code constants
///
/// Error code range: 3001-3003
pub struct ComputationErrorCodes {}

impl ComputationErrorCodes {
    /// Decoded waveform contains no samples
    pub const EMPTY_WAVEFORM: i32 = 3001;

    /// A feature evaluated to NaN or infinity
    pub const NON_FINITE: i32 = 3002;

    /// Analysis parameters are inconsistent
    pub const INVALID_CONFIG: i32 = 3003;
}

/// Numeric failures downstream of decoding
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    #[error("Decoded waveform is empty")]
    EmptyWaveform,

    #[error("Feature {feature} is not a finite number")]
    NonFinite { feature: String },

    #[error("Invalid analysis configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl ErrorCode for ComputationError {
    fn code(&self) -> i32 {
        match self {
            ComputationError::EmptyWaveform => ComputationErrorCodes::EMPTY_WAVEFORM,
            ComputationError::NonFinite { .. } => ComputationErrorCodes::NON_FINITE,
            ComputationError::InvalidConfig { .. } => ComputationErrorCodes::INVALID_CONFIG,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computation_error_codes() {
        assert_eq!(
            ComputationError::EmptyWaveform.code(),
            ComputationErrorCodes::EMPTY_WAVEFORM
        );
        assert_eq!(
            ComputationError::NonFinite {
                feature: "rms".to_string()
            }
            .code(),
            ComputationErrorCodes::NON_FINITE
        );
        assert_eq!(
            ComputationError::InvalidConfig {
                reason: "test".to_string()
            }
            .code(),
            ComputationErrorCodes::INVALID_CONFIG
        );
    }

    #[test]
    fn test_non_finite_message_names_feature() {
        let err = ComputationError::NonFinite {
            feature: "spectral_centroid".to_string(),
        };
        assert_eq!(
            err.message(),
            "Feature spectral_centroid is not a finite number"
        );
    }
}
