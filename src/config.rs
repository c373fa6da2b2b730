/*
 * @file config.rs
 * @brief Runtime settings: config.json, environment and CLI precedence
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

//! Runtime settings.
//!
//! Values resolve in this order: command-line flag, environment variable
//! (both handled by [`Cli`]), `config.json`, built-in default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::Cli;
use crate::responses::RESPONSES_FILE;
use crate::speech::DEFAULT_VOICE_COMMAND;

/// Path to the JSON configuration file that holds runtime defaults.
pub const CONFIG_PATH: &str = "config.json";

/// Pause before each reply, imitating someone typing.
const DEFAULT_TYPING_DELAY_MS: u64 = 1_000;

/// Default location of the Whisper model (downloaded on first voice turn).
const DEFAULT_WHISPER_MODEL_PATH: &str = "models/ggml-base.en.bin";

/// Which responder drives the conversation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Keyword table without memory.
    Classic,
    /// Ordered rules with session memory.
    #[default]
    Contextual,
}

/// How the session obtains user input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Ask for text or voice before every turn.
    #[default]
    Ask,
    /// Always read a line from the keyboard.
    Text,
    /// Always listen to the microphone.
    Voice,
}

/// Strongly typed representation of `config.json`. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub engine: Option<Engine>,
    pub mode: Option<InputMode>,
    pub speech: Option<bool>,
    pub voice_command: Option<String>,
    pub typing_delay_ms: Option<u64>,
    pub seed: Option<u64>,
    pub responses_path: Option<PathBuf>,
    pub whisper_model_path: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub engine: Engine,
    pub mode: InputMode,
    pub speech: bool,
    pub voice_command: String,
    pub typing_delay: Duration,
    pub seed: Option<u64>,
    pub responses_path: PathBuf,
    pub whisper_model_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&Cli::default(), FileConfig::default())
    }
}

impl Settings {
    /// Loads `config.json` from the path named by `cli` and resolves every value.
    pub fn load(cli: &Cli) -> Self {
        Self::resolve(cli, load_file_config(&cli.config))
    }

    /// Merges command-line/environment values over the file over defaults.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Self {
        Self {
            engine: cli.engine.or(file.engine).unwrap_or_default(),
            mode: cli.mode.or(file.mode).unwrap_or_default(),
            speech: cli.mute.map(|mute| !mute).or(file.speech).unwrap_or(true),
            voice_command: cli
                .voice_command
                .clone()
                .or(file.voice_command)
                .unwrap_or_else(|| DEFAULT_VOICE_COMMAND.to_string()),
            typing_delay: Duration::from_millis(
                cli.typing_delay_ms
                    .or(file.typing_delay_ms)
                    .unwrap_or(DEFAULT_TYPING_DELAY_MS),
            ),
            seed: cli.seed.or(file.seed),
            responses_path: cli
                .responses
                .clone()
                .or(file.responses_path)
                .unwrap_or_else(|| PathBuf::from(RESPONSES_FILE)),
            whisper_model_path: file
                .whisper_model_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WHISPER_MODEL_PATH)),
        }
    }
}

/// Loads `config.json`, falling back to an empty configuration.
///
/// # Details
/// A missing file is expected and only logged at debug level. A file that
/// exists but cannot be read or parsed is reported as a warning.
///
/// # Arguments
/// * `path` - The configuration file to read.
///
/// # Returns
/// * `FileConfig` - The parsed or empty configuration.
pub fn load_file_config(path: &Path) -> FileConfig {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return FileConfig::default();
    }
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %path.display(), "config parse error: {}", err);
                FileConfig::default()
            }
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), "config load error: {}", err);
            FileConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("chatbuddy").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let settings = Settings::default();
        assert_eq!(settings.engine, Engine::Contextual);
        assert_eq!(settings.mode, InputMode::Ask);
        assert!(settings.speech);
        assert_eq!(settings.typing_delay, Duration::from_millis(1_000));
        assert_eq!(settings.responses_path, PathBuf::from(RESPONSES_FILE));
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn file_overrides_defaults() {
        let file: FileConfig = serde_json::from_str(
            r#"{ "engine": "classic", "mode": "text", "speech": false, "typing_delay_ms": 0, "seed": 9 }"#,
        )
        .unwrap();
        let settings = Settings::resolve(&Cli::default(), file);
        assert_eq!(settings.engine, Engine::Classic);
        assert_eq!(settings.mode, InputMode::Text);
        assert!(!settings.speech);
        assert_eq!(settings.typing_delay, Duration::ZERO);
        assert_eq!(settings.seed, Some(9));
    }

    #[test]
    fn cli_overrides_file() {
        let file: FileConfig =
            serde_json::from_str(r#"{ "engine": "classic", "typing_delay_ms": 500 }"#).unwrap();
        let settings = Settings::resolve(
            &cli(&["--engine", "contextual", "--typing-delay-ms", "5", "--mute"]),
            file,
        );
        assert_eq!(settings.engine, Engine::Contextual);
        assert_eq!(settings.typing_delay, Duration::from_millis(5));
        assert!(!settings.speech);
    }

    #[test]
    fn explicit_unmute_overrides_file() {
        let muted_file = || serde_json::from_str::<FileConfig>(r#"{ "speech": false }"#).unwrap();
        assert!(Settings::resolve(&cli(&["--mute=false"]), muted_file()).speech);
        assert!(!Settings::resolve(&cli(&[]), muted_file()).speech);

        let speaking_file = serde_json::from_str::<FileConfig>(r#"{ "speech": true }"#).unwrap();
        assert!(!Settings::resolve(&cli(&["--mute=1"]), speaking_file).speech);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<FileConfig>(r#"{ "colour": "blue" }"#).is_err());
    }

    #[test]
    fn load_falls_back_on_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let config = load_file_config(file.path());
        assert!(config.engine.is_none());
    }

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "voice_command": "espeak-ng" }}"#).unwrap();
        let settings = Settings::load(&cli(&["--config", file.path().to_str().unwrap()]));
        assert_eq!(settings.voice_command, "espeak-ng");
    }
}
