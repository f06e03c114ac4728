//! Audio decoder using symphonia
//!
//! Detects the container format, decodes the first audio track to f32 and
//! downmixes every packet to mono by averaging channels.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use log::{debug, warn};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::DecodeError;

/// Mono PCM decoded at the file's native rate
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    /// Native sample rate of the source
    pub sample_rate: u32,
    /// Channel count of the source before downmixing
    pub channels: usize,
}

/// Decode an entire audio file to mono f32 samples.
///
/// # Errors
/// - `NotFound` / `Io` if the file cannot be opened
/// - `EmptyFile` if the file has zero length
/// - `UnsupportedFormat` if no reader recognises the container
/// - `NoAudioTrack` if the container has no decodable track
/// - `Corrupt` if the stream cannot be read or no packet decodes
pub fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let display = path.display().to_string();

    let metadata = fs::metadata(path).map_err(|err| DecodeError::from_io(&display, &err))?;
    if metadata.len() == 0 {
        return Err(DecodeError::EmptyFile { path: display });
    }

    let file = File::open(path).map_err(|err| DecodeError::from_io(&display, &err))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let opened = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| match err {
            SymphoniaError::IoError(io_err) if io_err.kind() != io::ErrorKind::UnexpectedEof => {
                DecodeError::from_io(&display, &io_err)
            }
            SymphoniaError::Unsupported(reason) => DecodeError::UnsupportedFormat {
                path: display.clone(),
                reason: reason.to_string(),
            },
            other => DecodeError::UnsupportedFormat {
                path: display.clone(),
                reason: other.to_string(),
            },
        })?;

    let mut format = opened.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::NoAudioTrack {
            path: display.clone(),
        })?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| DecodeError::UnsupportedFormat {
            path: display.clone(),
            reason: err.to_string(),
        })?;

    let mut decoded = DecodeProgress::new(sample_rate, channels);

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                decoded.stop_on_reset(&display);
                break;
            }
            Err(err) => {
                return Err(DecodeError::Corrupt {
                    path: display,
                    reason: err.to_string(),
                })
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(buffer_ref) => {
                let spec = *buffer_ref.spec();
                let mut buffer = SampleBuffer::<f32>::new(buffer_ref.capacity() as u64, spec);
                buffer.copy_interleaved_ref(buffer_ref);
                decoded.push(buffer.samples(), spec.rate, spec.channels.count());
            }
            Err(SymphoniaError::DecodeError(reason)) => {
                warn!("[Decoder] Skipping malformed packet in {}: {}", display, reason);
                decoded.skip(reason);
            }
            Err(err) => {
                return Err(DecodeError::Corrupt {
                    path: display,
                    reason: err.to_string(),
                })
            }
        }
    }

    decoded.finish(display)
}

/// Running state of the packet loop
struct DecodeProgress {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: usize,
    decoded_packets: usize,
    last_error: Option<String>,
}

impl DecodeProgress {
    /// Start from the rate and channel count advertised by the container
    fn new(sample_rate: u32, channels: usize) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            channels,
            decoded_packets: 0,
            last_error: None,
        }
    }

    /// Append one decoded packet of interleaved samples
    fn push(&mut self, interleaved: &[f32], sample_rate: u32, channels: usize) {
        self.sample_rate = sample_rate;
        self.channels = channels;
        downmix_into(interleaved, channels, &mut self.samples);
        self.decoded_packets += 1;
    }

    /// Record a packet the codec rejected
    fn skip(&mut self, reason: &str) {
        self.last_error = Some(reason.to_string());
    }

    /// The track changed its parameters mid-stream; only what was decoded so
    /// far is kept
    fn stop_on_reset(&self, path: &str) {
        warn!(
            "[Decoder] Stream parameters changed in {}; keeping the first {} samples",
            path,
            self.samples.len()
        );
    }

    /// Validate the outcome of the packet loop for `path`
    ///
    /// A stream where every packet failed is `Corrupt`. A stream with no
    /// packets at all yields an empty waveform.
    fn finish(self, path: String) -> Result<DecodedAudio, DecodeError> {
        if self.decoded_packets == 0 {
            if let Some(reason) = self.last_error {
                return Err(DecodeError::Corrupt { path, reason });
            }
        }

        if self.sample_rate == 0 {
            return Err(DecodeError::Corrupt {
                path,
                reason: "unknown sample rate".to_string(),
            });
        }

        debug!(
            "[Decoder] {} packets, {} mono samples, {} Hz, {} channels",
            self.decoded_packets,
            self.samples.len(),
            self.sample_rate,
            self.channels
        );

        Ok(DecodedAudio {
            samples: self.samples,
            sample_rate: self.sample_rate,
            channels: self.channels.max(1),
        })
    }
}

/// Average interleaved frames into mono samples appended to `out`.
fn downmix_into(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }

    let scale = 1.0 / channels as f32;
    out.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() * scale),
    );
}
