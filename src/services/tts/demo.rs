//! Terminal link of the speech chain: a fixed 440 Hz tone as WAV.

use std::f32::consts::PI;
use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use log::warn;

use crate::errors::AppResult;
use crate::models::{AudioHandle, SpeechSource};

pub const TONE_FREQUENCY_HZ: f32 = 440.0;
pub const TONE_AMPLITUDE: f32 = 0.1;
pub const TONE_DURATION_SECS: u32 = 10;
pub const TONE_SAMPLE_RATE: u32 = 8_000;

/// Payload used when even the tone cannot be encoded.
const PLACEHOLDER: &[u8] = b"demo audio data";

fn encode_tone() -> AppResult<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: TONE_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        let total = TONE_SAMPLE_RATE * TONE_DURATION_SECS;
        for i in 0..total {
            let t = i as f32 / TONE_SAMPLE_RATE as f32;
            let sample = (2.0 * PI * TONE_FREQUENCY_HZ * t).sin() * TONE_AMPLITUDE;
            writer.write_sample((sample * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Always returns a playable handle.
pub fn demo_audio() -> AudioHandle {
    let data = encode_tone().unwrap_or_else(|e| {
        warn!("Failed to encode demo tone: {}", e);
        PLACEHOLDER.to_vec()
    });
    AudioHandle::new(data, "audio/wav", SpeechSource::DemoTone)
}
