/*
 * @file memory.rs
 * @brief Per-session conversational memory for Chatbuddy
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

//! Session memory remembered between turns of a single conversation.

use std::fmt;

/// Mood most recently reported by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mood {
    Sad,
    Happy,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mood::Sad => f.write_str("sad"),
            Mood::Happy => f.write_str("happy"),
        }
    }
}

/// Flat record of what the bot knows about the user.
///
/// # Details
/// Created empty when a session starts and owned by the session loop, which
/// threads it through every call to a responder. Fields are overwritten when
/// a matching input arrives and are never cleared; the whole record is dropped
/// with the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    /// Name the user introduced themselves with, title-cased.
    pub name: Option<String>,
    /// Mood the user last reported.
    pub last_mood: Option<Mood>,
    /// Topic of the last recommendation request.
    pub last_topic: Option<String>,
}

impl Memory {
    /// Creates an empty memory for a new session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the remembered name, or `fallback` when none was given yet.
    ///
    /// # Arguments
    /// * `fallback` - Literal used in place of an unknown name (e.g. "there").
    ///
    /// # Returns
    /// * `&str` - The name to substitute into a `{name}` template.
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }

    /// Stores the user's name, replacing any previous one.
    pub fn remember_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Stores the mood the user just reported.
    pub fn remember_mood(&mut self, mood: Mood) {
        self.last_mood = Some(mood);
    }

    /// Stores the topic of the latest request.
    pub fn remember_topic(&mut self, topic: impl Into<String>) {
        self.last_topic = Some(topic.into());
    }
}
