// Error types for the feature extractor
//
// This module defines the error taxonomy for decoding and feature computation,
// with numeric error codes so the CLI can map failures to distinct exit codes.

mod computation;
mod decode;

pub use computation::{ComputationError, ComputationErrorCodes};
pub use decode::{DecodeError, DecodeErrorCodes};

use log::debug;
use thiserror::Error;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Top-level failure of a single extraction
///
/// Either the file could not be turned into a waveform, or a feature could
/// not be computed from it. There is no partial-success mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Computation(#[from] ComputationError),
}

impl ExtractError {
    /// Process exit code reported by the CLI for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            ExtractError::Decode(_) => 3,
            ExtractError::Computation(_) => 4,
        }
    }
}

impl ErrorCode for ExtractError {
    fn code(&self) -> i32 {
        match self {
            ExtractError::Decode(err) => err.code(),
            ExtractError::Computation(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Log an extraction error with structured context
///
/// Logged at debug level: the CLI already prints the error itself, this line
/// adds the code and component for diagnosis.
///
/// Fields logged:
/// - error_code: Numeric error code for programmatic handling
/// - component: Decoder or FeatureExtractor
/// - message: Human-readable error message
pub fn log_extract_error(err: &ExtractError, context: &str) {
    let component = match err {
        ExtractError::Decode(_) => "Decoder",
        ExtractError::Computation(_) => "FeatureExtractor",
    };
    debug!(
        "Extraction error in {}: code={}, component={}, message={}",
        context,
        err.code(),
        component,
        err.message()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_differ_by_category() {
        let decode: ExtractError = DecodeError::NotFound {
            path: "missing.wav".to_string(),
        }
        .into();
        let computation: ExtractError = ComputationError::EmptyWaveform.into();

        assert_ne!(decode.exit_code(), 0);
        assert_ne!(computation.exit_code(), 0);
        assert_ne!(decode.exit_code(), computation.exit_code());
    }

    #[test]
    fn test_extract_error_forwards_code_and_message() {
        let inner = DecodeError::EmptyFile {
            path: "empty.wav".to_string(),
        };
        let err = ExtractError::from(inner.clone());

        assert_eq!(err.code(), inner.code());
        assert_eq!(err.message(), inner.message());
    }
}
