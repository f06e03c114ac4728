//! Audio resampling using rubato
//!
//! Converts decoded mono audio to the analysis sample rate so features are
//! comparable across inputs with different native rates.

use log::debug;
use rubato::{
    Resampler as RubatoResampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};

use crate::error::DecodeError;

/// Input frames fed to the resampler per call
const CHUNK_SIZE: usize = 1024;

/// Band-limited sample rate converter for mono waveforms.
pub struct Resampler;

impl Resampler {
    /// Resample mono audio from `input_rate` to `output_rate`.
    ///
    /// Output length is `round(len * output_rate / input_rate)`. rubato
    /// already compensates the sinc filter's group delay, so the output is
    /// time-aligned with the input; the tail is flushed until that length
    /// is reached.
    ///
    /// # Notes
    /// If the rates already match, returns a copy without resampling
    pub fn resample(
        input: &[f32],
        input_rate: u32,
        output_rate: u32,
    ) -> Result<Vec<f32>, DecodeError> {
        if input_rate == 0 || output_rate == 0 {
            return Err(DecodeError::Resample {
                reason: format!("invalid rates {} -> {}", input_rate, output_rate),
            });
        }

        if input_rate == output_rate || input.is_empty() {
            debug!("Sample rate already at {}Hz, skipping resample", output_rate);
            return Ok(input.to_vec());
        }

        let ratio = output_rate as f64 / input_rate as f64;
        let expected_len = (input.len() as f64 * ratio).round() as usize;

        debug!(
            "Resampling {} frames from {}Hz to {}Hz",
            input.len(),
            input_rate,
            output_rate
        );

        let mut resampler = Self::create_resampler(ratio)?;
        let mut output = Vec::with_capacity(expected_len + CHUNK_SIZE);

        let mut chunks = input.chunks_exact(CHUNK_SIZE);
        for chunk in &mut chunks {
            let out = resampler
                .process(&[chunk][..], None)
                .map_err(Self::map_err)?;
            output.extend_from_slice(&out[0]);
        }

        let remainder = chunks.remainder();
        if !remainder.is_empty() {
            let tail = [remainder];
            let out = resampler
                .process_partial(Some(&tail[..]), None)
                .map_err(Self::map_err)?;
            output.extend_from_slice(&out[0]);
        }

        // Flush the filter tail until the whole signal is out
        while output.len() < expected_len {
            let out = resampler
                .process_partial(None::<&[Vec<f32>]>, None)
                .map_err(Self::map_err)?;
            if out[0].is_empty() {
                break;
            }
            output.extend_from_slice(&out[0]);
        }

        output.resize(expected_len, 0.0);

        debug!("Resampled to {} frames", output.len());
        Ok(output)
    }

    /// Create a sinc resampler with a fixed ratio.
    fn create_resampler(ratio: f64) -> Result<SincFixedIn<f32>, DecodeError> {
        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_SIZE, 1).map_err(|e| {
            DecodeError::Resample {
                reason: format!("Failed to create resampler: {}", e),
            }
        })
    }

    fn map_err(err: rubato::ResampleError) -> DecodeError {
        DecodeError::Resample {
            reason: err.to_string(),
        }
    }
}
