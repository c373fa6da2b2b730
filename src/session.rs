/*
 * @file session.rs
 * @brief Implementation of Chatbuddy's interactive chat loop
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

//! Chat session orchestration module.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::chooser::{Chooser, RandomChooser};
use crate::classic::ClassicResponder;
use crate::config::{Engine, InputMode, Settings};
use crate::listener::{ListenError, Listener};
use crate::memory::Memory;
use crate::responder::{ContextualResponder, Responder};
use crate::responses::load_responses;
use crate::speech::{MutedVoice, Speaker, SystemVoice};

/// Printed once when the session starts.
pub const BANNER: &str = "Chatbot: Hello! I am your friendly chatbot. Type 'bye' to exit.";

/// Asked before every turn in [`InputMode::Ask`].
pub const MODE_PROMPT: &str = "Type '1' for text chat or '2' for voice chat: ";

/// Printed when the mode answer is neither `1` nor `2`.
pub const INVALID_OPTION: &str = "Invalid option. Type 1 or 2.";

/// Printed when a voice turn produced no usable text.
pub const NOT_HEARD: &str = "Sorry, I didn't catch that.";

/// Printed when voice chat was chosen but the build cannot listen.
pub const VOICE_UNAVAILABLE: &str =
    "Voice chat is not available in this build. Rebuild with --features voice.";

const USER_PROMPT: &str = "You: ";
const LISTENING: &str = "Listening...";

/// Where the next utterance comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    Microphone,
}

/// Answer to [`MODE_PROMPT`] that is neither `1` nor `2`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid input mode choice {0:?}")]
pub struct InvalidChoice(pub String);

impl FromStr for InputSource {
    type Err = InvalidChoice;

    fn from_str(choice: &str) -> Result<Self, Self::Err> {
        match choice.trim() {
            "1" => Ok(InputSource::Keyboard),
            "2" => Ok(InputSource::Microphone),
            other => Err(InvalidChoice(other.to_string())),
        }
    }
}

/// Runs an interactive chat on stdin/stdout until the user says goodbye.
///
/// # Details
/// Builds the responder, chooser, speaker and listener described by
/// `settings`, then drives a [`ChatSession`] over the process streams.
///
/// # Errors
/// Returns an error when the terminal cannot be read or written, or when
/// voice-only mode was requested from a build without voice support.
pub fn run_chat(settings: &Settings) -> Result<()> {
    let responder: Box<dyn Responder> = match settings.engine {
        Engine::Classic => Box::new(ClassicResponder::new()),
        Engine::Contextual => Box::new(ContextualResponder::new(load_responses(
            &settings.responses_path,
        ))),
    };
    let speaker: Box<dyn Speaker> = if settings.speech {
        Box::new(SystemVoice::new(settings.voice_command.clone()))
    } else {
        Box::new(MutedVoice)
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = ChatSession::new(responder, stdin.lock(), stdout.lock())
        .with_chooser(Box::new(RandomChooser::from_seed(settings.seed)))
        .with_speaker(speaker)
        .with_listener(build_listener(settings))
        .with_mode(settings.mode)
        .with_typing_delay(settings.typing_delay);
    tracing::info!(engine = ?settings.engine, mode = ?settings.mode, "chat session started");
    session.run()?;
    tracing::info!(memory = ?session.memory(), "chat session ended");
    Ok(())
}

#[cfg(feature = "voice")]
fn build_listener(settings: &Settings) -> Box<dyn Listener> {
    Box::new(crate::listener::MicrophoneListener::new(
        settings.whisper_model_path.clone(),
    ))
}

#[cfg(not(feature = "voice"))]
fn build_listener(_settings: &Settings) -> Box<dyn Listener> {
    Box::new(crate::listener::UnavailableListener)
}

/// One conversation: its collaborators, its streams and its memory.
///
/// # Details
/// The session owns the [`Memory`] record for its whole lifetime and hands
/// it to the responder on every turn. Input and output streams are generic
/// so the loop can run against in-memory buffers.
pub struct ChatSession<R, W> {
    responder: Box<dyn Responder>,
    chooser: Box<dyn Chooser>,
    speaker: Box<dyn Speaker>,
    listener: Box<dyn Listener>,
    mode: InputMode,
    typing_delay: Duration,
    pause: Box<dyn FnMut(Duration)>,
    memory: Memory,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ChatSession<R, W> {
    /// Creates a muted, text-or-voice session with OS-seeded randomness and
    /// no typing delay.
    pub fn new(responder: Box<dyn Responder>, input: R, output: W) -> Self {
        Self {
            responder,
            chooser: Box::new(RandomChooser::from_os()),
            speaker: Box::new(MutedVoice),
            listener: Box::new(crate::listener::UnavailableListener),
            mode: InputMode::Ask,
            typing_delay: Duration::ZERO,
            pause: Box::new(std::thread::sleep),
            memory: Memory::new(),
            input,
            output,
        }
    }

    pub fn with_chooser(mut self, chooser: Box<dyn Chooser>) -> Self {
        self.chooser = chooser;
        self
    }

    pub fn with_speaker(mut self, speaker: Box<dyn Speaker>) -> Self {
        self.speaker = speaker;
        self
    }

    pub fn with_listener(mut self, listener: Box<dyn Listener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_mode(mut self, mode: InputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    /// Replaces how the typing delay is waited out; defaults to sleeping.
    pub fn with_pause(mut self, pause: Box<dyn FnMut(Duration)>) -> Self {
        self.pause = pause;
        self
    }

    /// What the bot has learned so far.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Consumes the session, returning its output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints the banner and processes turns until the conversation ends.
    ///
    /// # Returns
    /// `Ok(())` after a farewell or when input is exhausted.
    ///
    /// # Errors
    /// Bubbles up stream failures and an unusable voice-only configuration.
    pub fn run(&mut self) -> Result<()> {
        self.say_line(BANNER)?;
        while self.process_turn()? {}
        Ok(())
    }

    /// Executes one prompt-read-respond iteration.
    ///
    /// # Returns
    /// * `Ok(true)` to keep looping, `Ok(false)` to end the conversation.
    fn process_turn(&mut self) -> Result<bool> {
        let source = match self.mode {
            InputMode::Text => InputSource::Keyboard,
            InputMode::Voice => InputSource::Microphone,
            InputMode::Ask => {
                let Some(answer) = self.prompt_line(MODE_PROMPT)? else {
                    return Ok(false);
                };
                match answer.parse::<InputSource>() {
                    Ok(source) => source,
                    Err(err) => {
                        tracing::debug!("{}", err);
                        self.say_line(INVALID_OPTION)?;
                        return Ok(true);
                    }
                }
            }
        };
        let user_text = match source {
            InputSource::Keyboard => match self.prompt_line(USER_PROMPT)? {
                Some(text) => text,
                None => return Ok(false),
            },
            InputSource::Microphone => match self.hear()? {
                Some(text) => text,
                None => return Ok(true),
            },
        };
        self.handle_user_text(&user_text)
    }

    /// Listens for one utterance, reporting recoverable failures to the user.
    ///
    /// # Returns
    /// * `Ok(Some(text))` when speech was transcribed.
    /// * `Ok(None)` when the turn should be retried.
    ///
    /// # Errors
    /// Fails when voice is the only input mode and the build cannot listen.
    fn hear(&mut self) -> Result<Option<String>> {
        self.say_line(LISTENING)?;
        match self.listener.listen() {
            Ok(text) => {
                self.say_line(&format!("{}{}", USER_PROMPT, text))?;
                Ok(Some(text))
            }
            Err(ListenError::Unavailable) => {
                self.say_line(VOICE_UNAVAILABLE)?;
                if self.mode == InputMode::Voice {
                    anyhow::bail!("voice mode requested but voice input is not available");
                }
                Ok(None)
            }
            Err(err) => {
                tracing::warn!("voice input failed: {}", err);
                self.say_line(NOT_HEARD)?;
                Ok(None)
            }
        }
    }

    /// Replies to `user_text`, ending the loop after a farewell.
    fn handle_user_text(&mut self, user_text: &str) -> Result<bool> {
        if self.responder.ends_conversation(user_text) {
            self.reply(user_text)?;
            return Ok(false);
        }
        if !self.typing_delay.is_zero() && self.responder.simulates_typing() {
            (self.pause)(self.typing_delay);
        }
        self.reply(user_text)?;
        Ok(true)
    }

    fn reply(&mut self, user_text: &str) -> Result<()> {
        let response =
            self.responder
                .respond(user_text, &mut self.memory, self.chooser.as_mut());
        self.say_line(&format!("Chatbot: {}", response))?;
        if let Err(err) = self.speaker.speak(&response) {
            tracing::warn!("TTS error: {:#}", err);
        }
        Ok(())
    }

    /// Prints `prompt` without a newline and reads one line.
    ///
    /// # Returns
    /// * `Ok(Some(line))` without its line terminator.
    /// * `Ok(None)` at end of input.
    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush output")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            writeln!(self.output).context("Failed to write output")?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line).context("Failed to write output")?;
        self.output.flush().context("Failed to flush output")
    }
}
