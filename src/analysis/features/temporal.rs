// Temporal module - Time-domain feature extraction
//
// This module computes per-frame features directly from the waveform:
// root-mean-square energy and zero-crossing rate.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

use super::framing::{FramedSignal, PadMode};

/// Magnitudes at or below this are treated as exact zeros for ZCR
const ZERO_THRESHOLD: f32 = 1e-10;

/// Temporal feature computation functions
pub struct TemporalFeatures {
    frame_length: usize,
    hop_length: usize,
}

impl TemporalFeatures {
    /// Create a new temporal features processor
    ///
    /// # Arguments
    /// * `frame_length` - Samples per analysis frame
    /// * `hop_length` - Samples between frame starts
    pub fn new(frame_length: usize, hop_length: usize) -> Self {
        Self {
            frame_length,
            hop_length,
        }
    }

    /// RMS energy of every centred frame (zero padded at the borders)
    pub fn rms_frames(&self, audio: &[f32]) -> Vec<f32> {
        FramedSignal::new(audio, self.frame_length, self.hop_length, PadMode::Constant)
            .iter()
            .map(compute_rms)
            .collect()
    }

    /// Zero-crossing rate of every centred frame (edge padded at the borders)
    pub fn zcr_frames(&self, audio: &[f32]) -> Vec<f32> {
        FramedSignal::new(audio, self.frame_length, self.hop_length, PadMode::Edge)
            .iter()
            .map(compute_zcr)
            .collect()
    }
}

/// Compute root-mean-square energy
///
/// Formula: RMS = sqrt((1 / N) × Σ x[n]²)
pub fn compute_rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }

    let power: f64 =
        frame.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>() / frame.len() as f64;
    power.sqrt() as f32
}

/// Compute zero-crossing rate (ZCR)
///
/// ZCR = (number of adjacent pairs whose sign differs) / N
///
/// Values with |x| ≤ 1e-10 count as zero, and zero counts as positive, so
/// numerical noise around silence does not register as crossings.
///
/// # Returns
/// Zero-crossing rate (0.0 to 1.0)
pub fn compute_zcr(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }

    let is_negative = |x: f32| x < 0.0 && x.abs() > ZERO_THRESHOLD;

    let crossings = frame
        .windows(2)
        .filter(|pair| is_negative(pair[0]) != is_negative(pair[1]))
        .count();

    crossings as f32 / frame.len() as f32
}
