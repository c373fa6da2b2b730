//! Text-to-speech output.

use std::process::Command;

use anyhow::{Context, Result};

/// Speech program used when none is configured.
#[cfg(target_os = "macos")]
pub const DEFAULT_VOICE_COMMAND: &str = "say";

/// Speech program used when none is configured.
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_VOICE_COMMAND: &str = "espeak";

/// Renders replies as audio.
pub trait Speaker {
    /// Speaks `text`, blocking until playback finishes.
    ///
    /// # Errors
    /// Returns an error if the text is empty or playback fails.
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// Speaks through an external program such as macOS `say` or `espeak`.
#[derive(Clone, Debug)]
pub struct SystemVoice {
    program: String,
}

impl SystemVoice {
    /// Creates a voice that runs `program <text>` for every utterance.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemVoice {
    fn default() -> Self {
        Self::new(DEFAULT_VOICE_COMMAND)
    }
}

impl Speaker for SystemVoice {
    fn speak(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            anyhow::bail!("Cannot speak empty text");
        }
        let status = Command::new(&self.program)
            .arg(text)
            .status()
            .with_context(|| format!("Failed to run {}", self.program))?;
        if !status.success() {
            anyhow::bail!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

/// Discards every utterance; used with `--mute`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MutedVoice;

impl Speaker for MutedVoice {
    fn speak(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_voice_rejects_empty_text() {
        assert!(SystemVoice::default().speak("   ").is_err());
    }

    #[test]
    fn system_voice_fails_when_program_is_missing() {
        let mut voice = SystemVoice::new("chatbuddy-no-such-speech-program");
        assert!(voice.speak("hello").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn system_voice_runs_program() {
        let mut voice = SystemVoice::new("true");
        assert!(voice.speak("hello").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn system_voice_reports_failed_exit() {
        let mut voice = SystemVoice::new("false");
        assert!(voice.speak("hello").is_err());
    }

    #[test]
    fn muted_voice_accepts_anything() {
        assert!(MutedVoice.speak("").is_ok());
    }
}
