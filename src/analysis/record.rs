// FeatureRecord - the summary emitted for one audio file

use serde::{Deserialize, Serialize};

use crate::error::ComputationError;

/// Whole-file audio descriptors
///
/// Field order is the JSON output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Estimated tempo in beats per minute
    pub tempo: f32,
    /// Mean RMS energy across frames
    pub rms: f32,
    /// Per-coefficient mean MFCCs
    pub mfcc: Vec<f32>,
    /// Mean spectral centroid in Hz
    pub spectral_centroid: f32,
    /// Mean fraction of sign changes per frame
    pub zero_crossing_rate: f32,
}

impl FeatureRecord {
    /// Fail with the name of the first feature that is NaN or infinite
    pub fn ensure_finite(&self) -> Result<(), ComputationError> {
        let scalars = [
            ("tempo", self.tempo),
            ("rms", self.rms),
            ("spectral_centroid", self.spectral_centroid),
            ("zero_crossing_rate", self.zero_crossing_rate),
        ];

        if let Some((name, _)) = scalars.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ComputationError::NonFinite {
                feature: name.to_string(),
            });
        }

        if let Some(index) = self.mfcc.iter().position(|c| !c.is_finite()) {
            return Err(ComputationError::NonFinite {
                feature: format!("mfcc[{}]", index),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> FeatureRecord {
        FeatureRecord {
            tempo: 120.0,
            rms: 0.1,
            mfcc: vec![-300.0, 50.0, 0.5],
            spectral_centroid: 1500.0,
            zero_crossing_rate: 0.08,
        }
    }

    #[test]
    fn test_json_field_order() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        let keys = ["tempo", "rms", "mfcc", "spectral_centroid", "zero_crossing_rate"];

        let positions: Vec<usize> = keys
            .iter()
            .map(|key| json.find(&format!("\"{}\"", key)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{}", json);
    }

    #[test]
    fn test_finite_record_passes() {
        assert!(sample_record().ensure_finite().is_ok());
    }

    #[test]
    fn test_non_finite_scalar_is_named() {
        let mut record = sample_record();
        record.spectral_centroid = f32::NAN;

        assert_eq!(
            record.ensure_finite(),
            Err(ComputationError::NonFinite {
                feature: "spectral_centroid".to_string()
            })
        );
    }

    #[test]
    fn test_non_finite_mfcc_is_indexed() {
        let mut record = sample_record();
        record.mfcc[2] = f32::INFINITY;

        assert_eq!(
            record.ensure_finite(),
            Err(ComputationError::NonFinite {
                feature: "mfcc[2]".to_string()
            })
        );
    }
}
