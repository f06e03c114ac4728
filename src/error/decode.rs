// Decode error types and constants

use crate::error::ErrorCode;
use std::io;
use thiserror::Error;

/// Decode error code constants
///
/// Error code range: 2001-2007
pub struct DecodeErrorCodes {}

impl DecodeErrorCodes {
    /// Input path does not exist
    pub const NOT_FOUND: i32 = 2001;

    /// Input file exists but has zero length
    pub const EMPTY_FILE: i32 = 2002;

    /// Input file could not be opened or read
    pub const IO: i32 = 2003;

    /// No container/codec reader recognises the file
    pub const UNSUPPORTED_FORMAT: i32 = 2004;

    /// Container holds no decodable audio track
    pub const NO_AUDIO_TRACK: i32 = 2005;

    /// Stream is malformed and could not be decoded
    pub const CORRUPT: i32 = 2006;

    /// Sample rate conversion failed
    pub const RESAMPLE: i32 = 2007;
}

/// Failures turning a file path into a waveform
///
/// Covers everything up to and including resampling to the analysis rate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("Audio file not found: {path}")]
    NotFound { path: String },

    #[error("Audio file is empty: {path}")]
    EmptyFile { path: String },

    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Unsupported audio format in {path}: {reason}")]
    UnsupportedFormat { path: String, reason: String },

    #[error("No audio track found in {path}")]
    NoAudioTrack { path: String },

    #[error("Corrupt audio stream in {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Resampling failed: {reason}")]
    Resample { reason: String },
}

impl DecodeError {
    /// Classify an I/O failure on `path`
    pub fn from_io(path: &str, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DecodeError::NotFound {
                path: path.to_string(),
            },
            _ => DecodeError::Io {
                path: path.to_string(),
                reason: err.to_string(),
            },
        }
    }
}

impl ErrorCode for DecodeError {
    fn code(&self) -> i32 {
        match self {
            DecodeError::NotFound { .. } => DecodeErrorCodes::NOT_FOUND,
            DecodeError::EmptyFile { .. } => DecodeErrorCodes::EMPTY_FILE,
            DecodeError::Io { .. } => DecodeErrorCodes::IO,
            DecodeError::UnsupportedFormat { .. } => DecodeErrorCodes::UNSUPPORTED_FORMAT,
            DecodeError::NoAudioTrack { .. } => DecodeErrorCodes::NO_AUDIO_TRACK,
            DecodeError::Corrupt { .. } => DecodeErrorCodes::CORRUPT,
            DecodeError::Resample { .. } => DecodeErrorCodes::RESAMPLE,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}
