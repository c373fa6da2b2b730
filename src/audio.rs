/*
 * @file audio.rs
 * @brief Microphone capture and WAV helpers for Chatbuddy voice chat
 * @author Kevin Thomas
 * @date 2025
 *
 * MIT License
 *
 * Copyright (c) 2025 Kevin Thomas
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Audio capture and WAV file handling for voice chat.
//!
//! WAV encoding, silence detection and transcription preprocessing are always
//! available. Recording from the microphone needs the `voice` feature.

use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Sample rate for audio recording (16kHz).
///
/// Value is expressed in Hertz and matches Whisper's preferred input rate.
pub const SAMPLE_RATE: u32 = 16_000;

/// Number of audio channels (mono).
pub const CHANNELS: u16 = 1;

/// Bits per sample for WAV encoding.
const BITS_PER_SAMPLE: u16 = 16;

/// Minimum RMS amplitude considered speech.
///
/// Quiet microphones rarely exceed ~300 for normal speech, so the gate sits
/// low and leaves background noise to the transcriber.
pub const SILENCE_RMS_THRESHOLD: f32 = 150.0;

/// Saves mono 16 kHz samples to a WAV file.
///
/// # Parameters
/// * `path` - Destination path for the generated WAV file.
/// * `samples` - Signed 16-bit PCM frames to persist.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn save_wav(path: &Path, samples: &[i16]) -> Result<()> {
    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Loads a 16-bit WAV file as normalized 16 kHz mono samples.
///
/// # Details
/// Whisper expects `f32` samples in `[-1.0, 1.0]` at 16 kHz with a single
/// channel. Multi-channel input is averaged down to mono first, then
/// resampled with linear interpolation when the rate differs.
///
/// # Errors
/// Returns an error if the file cannot be opened or its samples cannot be read.
pub fn load_wav_for_transcription(path: &Path) -> Result<Vec<f32>> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read WAV samples")?;
    let mono = downmix(&normalize_samples(&samples), spec.channels);
    Ok(resample(&mono, spec.sample_rate, SAMPLE_RATE))
}

/// Whether `samples` carry enough energy to be worth transcribing.
///
/// # Details
/// Compares the root mean square of the signal against
/// [`SILENCE_RMS_THRESHOLD`]. An empty buffer is silence.
pub fn contains_speech(samples: &[i16]) -> bool {
    if samples.is_empty() {
        return false;
    }
    let energy = samples
        .iter()
        .map(|&sample| (sample as f32).powi(2))
        .sum::<f32>()
        / samples.len() as f32;
    energy.sqrt() >= SILENCE_RMS_THRESHOLD
}

/// Maps i16 PCM samples to f32 in `[-1.0, 1.0]`.
pub fn normalize_samples(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / 32768.0).collect()
}

/// Averages interleaved frames down to one channel.
pub fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    let channels = usize::from(channels.max(1));
    if channels == 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resamples mono audio with linear interpolation.
pub fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 {
        return input.to_vec();
    }
    let ratio = from_rate as f32 / to_rate as f32;
    let output_len = (input.len() as f32 / ratio) as usize;
    (0..output_len)
        .map(|i| sample_at_position(input, i as f32 * ratio))
        .collect()
}

/// Interpolates between the two samples around `pos`.
fn sample_at_position(input: &[f32], pos: f32) -> f32 {
    let idx = pos as usize;
    if idx + 1 < input.len() {
        let frac = pos - idx as f32;
        input[idx] * (1.0 - frac) + input[idx + 1] * frac
    } else {
        input.get(idx).copied().unwrap_or(0.0)
    }
}

#[cfg(feature = "voice")]
pub use capture::record_audio;

#[cfg(feature = "voice")]
mod capture {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use anyhow::Result;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{Device, Stream, StreamConfig, StreamError};

    use super::{CHANNELS, SAMPLE_RATE};

    type SharedSamples = Arc<Mutex<Vec<i16>>>;

    /// Records from the default input device for `duration`.
    ///
    /// # Returns
    /// A vector of 16-bit PCM audio samples.
    ///
    /// # Errors
    /// Returns an error if no input device is available, the stream cannot be
    /// built, or playback of the stream fails to start.
    pub fn record_audio(duration: Duration) -> Result<Vec<i16>> {
        let device = default_input_device()?;
        let samples: SharedSamples = Arc::new(Mutex::new(Vec::new()));
        let stream = build_input_stream(&device, &input_config(), samples.clone())?;
        stream.play()?;
        std::thread::sleep(duration);
        drop(stream);
        let captured = samples
            .lock()
            .map_err(|_| anyhow::anyhow!("Audio buffer lock poisoned"))?
            .clone();
        Ok(captured)
    }

    fn default_input_device() -> Result<Device> {
        cpal::default_host()
            .default_input_device()
            .ok_or_else(|| anyhow::anyhow!("No input device"))
    }

    fn input_config() -> StreamConfig {
        StreamConfig {
            channels: CHANNELS,
            sample_rate: cpal::SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        }
    }

    fn build_input_stream(
        device: &Device,
        config: &StreamConfig,
        samples: SharedSamples,
    ) -> Result<Stream> {
        device
            .build_input_stream(
                config,
                move |data: &[f32], _: &_| push_samples(&samples, data),
                log_stream_error,
                None,
            )
            .map_err(|err| anyhow::anyhow!(err))
    }

    /// Converts float frames to PCM and appends them to the buffer.
    fn push_samples(buffer: &SharedSamples, data: &[f32]) {
        if let Ok(mut guard) = buffer.lock() {
            guard.extend(data.iter().map(|&sample| (sample * i16::MAX as f32) as i16));
        }
    }

    fn log_stream_error(error: StreamError) {
        tracing::warn!("audio stream error: {}", error);
    }

}
