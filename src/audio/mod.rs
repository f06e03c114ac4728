// Audio module - file decoding and conversion to the analysis sample rate

pub mod decoder;
pub mod resampler;

pub use decoder::{decode_file, DecodedAudio};
pub use resampler::Resampler;

use std::path::Path;

use log::debug;

use crate::error::DecodeError;

/// Decode `path` into a mono waveform at `sample_rate`
///
/// This is the complete "load" step: format detection + decode + downmix, then
/// band-limited resampling when the native rate differs from the target.
pub fn load(path: &Path, sample_rate: u32) -> Result<Vec<f32>, DecodeError> {
    let decoded = decode_file(path)?;
    debug!(
        "[Load] {}: {} frames at {} Hz ({} channels)",
        path.display(),
        decoded.samples.len(),
        decoded.sample_rate,
        decoded.channels
    );

    Resampler::resample(&decoded.samples, decoded.sample_rate, sample_rate)
}
