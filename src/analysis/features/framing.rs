// Framing module - centred, overlapping analysis frames
//
// Every framed feature pads the signal by half a frame on both sides so frame
// `t` is centred on sample `t * hop`. A signal of `n` samples therefore
// yields `1 + n / hop` frames.

/// How the half-frame borders are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// Zeros
    Constant,
    /// Repeat the first/last sample
    Edge,
}

/// Padded copy of a signal that can be iterated frame by frame
pub struct FramedSignal {
    padded: Vec<f32>,
    frame_length: usize,
    hop_length: usize,
}

impl FramedSignal {
    /// Pad `signal` for centred framing
    ///
    /// # Arguments
    /// * `signal` - Time-domain samples
    /// * `frame_length` - Samples per frame
    /// * `hop_length` - Samples between frame starts (must be > 0)
    /// * `mode` - Border fill
    pub fn new(signal: &[f32], frame_length: usize, hop_length: usize, mode: PadMode) -> Self {
        let pad = frame_length / 2;
        let (left, right) = match mode {
            PadMode::Constant => (0.0, 0.0),
            PadMode::Edge => (
                signal.first().copied().unwrap_or(0.0),
                signal.last().copied().unwrap_or(0.0),
            ),
        };

        let mut padded = Vec::with_capacity(signal.len() + 2 * pad);
        padded.resize(pad, left);
        padded.extend_from_slice(signal);
        padded.resize(signal.len() + 2 * pad, right);

        Self {
            padded,
            frame_length,
            hop_length: hop_length.max(1),
        }
    }

    /// Iterate over frames in time order
    pub fn iter(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.padded
            .windows(self.frame_length)
            .step_by(self.hop_length)
    }

    /// Number of frames produced by [`FramedSignal::iter`]
    pub fn len(&self) -> usize {
        if self.padded.len() < self.frame_length {
            0
        } else {
            (self.padded.len() - self.frame_length) / self.hop_length + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_matches_centred_convention() {
        for len in [1usize, 511, 512, 513, 16_000] {
            let signal = vec![1.0; len];
            let framed = FramedSignal::new(&signal, 2048, 512, PadMode::Constant);
            assert_eq!(framed.len(), 1 + len / 512, "len {}", len);
            assert_eq!(framed.iter().count(), framed.len());
        }
    }

    #[test]
    fn test_constant_padding_is_zero() {
        let framed = FramedSignal::new(&[1.0, 2.0, 3.0, 4.0], 4, 2, PadMode::Constant);
        let frames: Vec<&[f32]> = framed.iter().collect();
        assert_eq!(frames[0], &[0.0, 0.0, 1.0, 2.0]);
        assert_eq!(frames[1], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(frames[2], &[3.0, 4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_edge_padding_repeats_boundary() {
        let framed = FramedSignal::new(&[1.0, 2.0, 3.0, 4.0], 4, 2, PadMode::Edge);
        let frames: Vec<&[f32]> = framed.iter().collect();
        assert_eq!(frames[0], &[1.0, 1.0, 1.0, 2.0]);
        assert_eq!(frames[2], &[3.0, 4.0, 4.0, 4.0]);
    }
}
