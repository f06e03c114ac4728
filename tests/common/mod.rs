// Shared WAV fixture helpers for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

/// Generate a sine wave
pub fn generate_sine_wave(
    sample_rate: u32,
    frequency: f32,
    amplitude: f32,
    duration_samples: usize,
) -> Vec<f32> {
    (0..duration_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate clicks (short decaying 1 kHz bursts) every `interval_samples`
pub fn generate_click_track(sample_rate: u32, interval_samples: usize, seconds: u32) -> Vec<f32> {
    let total = (sample_rate * seconds) as usize;
    let mut signal = vec![0.0; total];

    for start in (0..total).step_by(interval_samples) {
        for offset in 0..400 {
            if let Some(sample) = signal.get_mut(start + offset) {
                let t = offset as f32 / sample_rate as f32;
                let decay = (-(offset as f32) / 80.0).exp();
                *sample = 0.8 * decay * (2.0 * std::f32::consts::PI * 1000.0 * t).sin();
            }
        }
    }

    signal
}

/// Write 16-bit PCM with every channel carrying the same samples
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("create wav");
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(value).expect("write sample");
        }
    }
    writer.finalize().expect("finalize wav");
}

/// Write a 1 s, 440 Hz, amplitude 0.5 mono sine at 16 kHz into `dir`
pub fn sine_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("sine_440.wav");
    write_wav(&path, &generate_sine_wave(16_000, 440.0, 0.5, 16_000), 16_000, 1);
    path
}
