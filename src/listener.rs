/*
 * @file listener.rs
 * @brief Voice input: microphone capture and local Whisper transcription
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

//! Voice input for the chat session.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a voice turn produced no text. Every variant is recoverable: the
/// session apologises and prompts again.
#[derive(Debug, Error)]
pub enum ListenError {
    #[error("no speech detected")]
    Silence,
    #[error("transcription was empty")]
    EmptyTranscript,
    #[error("voice input is not available in this build")]
    Unavailable,
    #[error("microphone error: {0:#}")]
    Capture(anyhow::Error),
    #[error("transcription error: {0:#}")]
    Transcription(anyhow::Error),
}

/// Turns one utterance into text.
pub trait Listener {
    /// Blocks until an utterance has been captured and transcribed.
    ///
    /// # Errors
    /// Returns a [`ListenError`] when nothing intelligible was heard.
    fn listen(&mut self) -> Result<String, ListenError>;
}

/// Stand-in used when the binary was built without the `voice` feature.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableListener;

impl Listener for UnavailableListener {
    fn listen(&mut self) -> Result<String, ListenError> {
        Err(ListenError::Unavailable)
    }
}

/// Removes a temporary recording when dropped.
///
/// # Details
/// Guarantees the WAV file handed to the transcriber never outlives the turn
/// that created it, including early returns.
pub struct TempAudioGuard {
    path: PathBuf,
}

impl TempAudioGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudioGuard {
    fn drop(&mut self) {
        fs::remove_file(&self.path).ok();
    }
}

/// Trims a transcript, rejecting one that is empty.
pub fn clean_transcript(raw: &str) -> Result<String, ListenError> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        Err(ListenError::EmptyTranscript)
    } else {
        Ok(text)
    }
}

#[cfg(feature = "voice")]
pub use microphone::MicrophoneListener;

#[cfg(feature = "voice")]
mod microphone {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use anyhow::{Context, Result};
    use whisper_rs::{
        FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState,
    };

    use super::{clean_transcript, ListenError, Listener, TempAudioGuard};
    use crate::audio::{contains_speech, load_wav_for_transcription, record_audio, save_wav};

    /// Amount of audio captured per voice turn.
    const RECORD_DURATION: Duration = Duration::from_secs(5);

    /// Pause before recording so the user can start speaking.
    const PRE_RECORD_DELAY: Duration = Duration::from_millis(200);

    /// Source of the GGML model downloaded on first use.
    const MODEL_URL: &str =
        "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.en.bin";

    /// Records from the default microphone and transcribes with local Whisper.
    ///
    /// # Details
    /// The Whisper context is created lazily on the first turn, downloading
    /// the model when it is missing. An init failure is reported for that turn
    /// and retried on the next one.
    pub struct MicrophoneListener {
        model_path: PathBuf,
        temp_audio_path: PathBuf,
        context: Option<WhisperContext>,
    }

    impl MicrophoneListener {
        pub fn new(model_path: impl Into<PathBuf>) -> Self {
            Self {
                model_path: model_path.into(),
                temp_audio_path: std::env::temp_dir().join("chatbuddy-turn.wav"),
                context: None,
            }
        }

        fn ensure_context(&mut self) -> Result<&WhisperContext> {
            if self.context.is_none() {
                self.context = Some(init_whisper(&self.model_path)?);
            }
            self.context
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("Whisper context missing after initialization"))
        }
    }

    impl Listener for MicrophoneListener {
        fn listen(&mut self) -> Result<String, ListenError> {
            std::thread::sleep(PRE_RECORD_DELAY);
            let samples = record_audio(RECORD_DURATION).map_err(ListenError::Capture)?;
            if !contains_speech(&samples) {
                return Err(ListenError::Silence);
            }
            let guard = TempAudioGuard::new(self.temp_audio_path.clone());
            save_wav(guard.path(), &samples).map_err(ListenError::Capture)?;
            let audio = load_wav_for_transcription(guard.path())
                .map_err(ListenError::Transcription)?;
            let ctx = self.ensure_context().map_err(ListenError::Transcription)?;
            let raw = transcribe(ctx, &audio).map_err(ListenError::Transcription)?;
            clean_transcript(&raw)
        }
    }

    /// Loads the Whisper model, downloading it first when absent.
    fn init_whisper(model_path: &Path) -> Result<WhisperContext> {
        if !model_path.exists() {
            download_model(model_path)?;
        }
        let path = model_path
            .to_str()
            .context("Whisper model path is not valid UTF-8")?;
        let mut params = WhisperContextParameters::default();
        params.use_gpu(false);
        WhisperContext::new_with_params(path, params).context("Failed to initialize Whisper")
    }

    /// Fetches the GGML model with curl.
    fn download_model(model_path: &Path) -> Result<()> {
        if let Some(parent) = model_path.parent() {
            fs::create_dir_all(parent)?;
        }
        tracing::info!(path = %model_path.display(), "downloading Whisper model");
        let output = std::process::Command::new("curl")
            .arg("-L")
            .arg("-o")
            .arg(model_path)
            .arg(MODEL_URL)
            .output()
            .context("Failed to execute curl")?;
        if !output.status.success() {
            anyhow::bail!("Failed to download Whisper model");
        }
        Ok(())
    }

    /// Runs English greedy decoding and joins every segment.
    fn transcribe(ctx: &WhisperContext, audio: &[f32]) -> Result<String> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("en"));
        params.set_print_progress(false);
        params.set_print_special(false);
        params.set_print_realtime(false);
        let mut state = ctx
            .create_state()
            .context("Failed to create Whisper state")?;
        state
            .full(params, audio)
            .context("Whisper transcription failed")?;
        Ok(collect_segments(&state))
    }

    fn collect_segments(state: &WhisperState) -> String {
        let count = state.full_n_segments().unwrap_or(0);
        (0..count)
            .filter_map(|i| state.full_get_segment_text(i).ok())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
