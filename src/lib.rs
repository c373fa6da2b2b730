/*
 * @file lib.rs
 * @brief Chatbuddy library root
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

//! Chatbuddy - a friendly rule-based chatbot you can type or talk to.
//!
//! This library provides:
//! - An ordered rule engine that remembers the user's name, mood and topic
//! - The original keyword-table bot, kept as the `classic` engine
//! - An interactive session loop with text input, optional microphone input
//!   transcribed by a local Whisper model (`voice` feature), and replies
//!   spoken through the system speech program
//!
//! # Example
//! ```
//! use chatbuddy::chooser::ScriptedChooser;
//! use chatbuddy::memory::Memory;
//! use chatbuddy::responder::{ContextualResponder, Responder};
//!
//! let responder = ContextualResponder::default();
//! let mut memory = Memory::new();
//! let mut chooser = ScriptedChooser::constant(0);
//!
//! responder.respond("my name is ada", &mut memory, &mut chooser);
//! let reply = responder.respond("hello!", &mut memory, &mut chooser);
//! assert_eq!(reply, "Hello Ada! How are you today?");
//! ```

pub mod audio;
pub mod chooser;
pub mod classic;
pub mod cli;
pub mod config;
pub mod listener;
pub mod memory;
pub mod responder;
pub mod responses;
pub mod session;
pub mod speech;
