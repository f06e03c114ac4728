// MFCC module - Mel-frequency cepstral coefficients
//
// Pipeline per frame:
// 1. Power spectrum via STFT (Hann window, centred frames)
// 2. Mel filterbank projection
// 3. Power-to-dB with a global top_db floor
// 4. Orthonormal DCT-II across mel bands, keeping the first n_mfcc terms
//
// Steps 1-3 are the shared LogMelSpectrogram; this module does step 4.

/// Orthonormal DCT-II with a pre-computed basis
pub struct Dct {
    /// n_out rows of n_in cosine weights, scale folded in
    basis: Vec<Vec<f32>>,
}

impl Dct {
    /// # Arguments
    /// * `n_in` - Input length (mel bands)
    /// * `n_out` - Coefficients kept
    pub fn new(n_in: usize, n_out: usize) -> Self {
        let n = n_in as f64;
        let basis = (0..n_out)
            .map(|k| {
                let scale = if k == 0 {
                    (1.0 / n).sqrt()
                } else {
                    (2.0 / n).sqrt()
                };
                (0..n_in)
                    .map(|i| {
                        let angle = std::f64::consts::PI * k as f64 * (2.0 * i as f64 + 1.0)
                            / (2.0 * n);
                        (scale * angle.cos()) as f32
                    })
                    .collect()
            })
            .collect();

        Self { basis }
    }

    pub fn apply(&self, input: &[f32]) -> Vec<f32> {
        self.basis
            .iter()
            .map(|row| {
                row.iter()
                    .zip(input)
                    .map(|(&w, &x)| w as f64 * x as f64)
                    .sum::<f64>() as f32
            })
            .collect()
    }
}

/// MFCCs from a log-mel spectrogram
pub struct MfccProcessor {
    dct: Dct,
}

impl MfccProcessor {
    /// # Arguments
    /// * `n_mels` - Mel bands of the input spectrogram
    /// * `n_mfcc` - Coefficients per frame
    pub fn new(n_mels: usize, n_mfcc: usize) -> Self {
        Self {
            dct: Dct::new(n_mels, n_mfcc),
        }
    }

    /// MFCCs of every frame, frames × n_mfcc
    pub fn mfcc_frames(&self, log_mel: &[Vec<f32>]) -> Vec<Vec<f32>> {
        log_mel.iter().map(|frame| self.dct.apply(frame)).collect()
    }
}
