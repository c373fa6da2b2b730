/*
 * @file responder.rs
 * @brief Memory-aware rule matching and reply selection
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

//! Reply selection: the [`Responder`] seam and the memory-aware rule engine.

use crate::chooser::Chooser;
use crate::memory::{Memory, Mood};
use crate::responses::{fill_template, Category, ResponseTable};

/// Reply given when no rule matches.
pub const FALLBACK_REPLY: &str = "I didn't get that. Can you say it differently?";

/// Template used after the user introduces themselves.
const INTRODUCTION_TEMPLATE: &str = "Nice to meet you, {name}!";

/// Follow-up to "how are you" after the user said they were sad.
pub const SAD_FOLLOW_UP: &str = "You said you were sad earlier, are you feeling better now?";

/// Follow-up to "how are you" after the user said they were happy.
pub const HAPPY_FOLLOW_UP: &str = "You were happy earlier! Hope the good mood continues";

/// Answer to "how are you" when no mood is known.
pub const NEUTRAL_FOLLOW_UP: &str = "I'm doing great! How about you?";

/// Name used in greetings before the user introduced themselves.
const GREETING_FALLBACK_NAME: &str = "there";

/// Name used in every other template before the user introduced themselves.
const DEFAULT_FALLBACK_NAME: &str = "friend";

/// Phrase whose tail is taken as the user's name.
const NAME_PHRASE: &str = "my name is";

/// Turns user text into a reply, optionally updating session memory.
///
/// # Details
/// Implementations are pure apart from the memory they are handed: no I/O,
/// no global state, and every random pick goes through `chooser`.
pub trait Responder {
    /// Produces the reply for `input`. Total over every string.
    fn respond(&self, input: &str, memory: &mut Memory, chooser: &mut dyn Chooser) -> String;

    /// Whether replying to `input` should end the conversation.
    fn ends_conversation(&self, input: &str) -> bool;

    /// Whether the session should pause before replies, imitating typing.
    fn simulates_typing(&self) -> bool {
        true
    }
}

/// What a matched rule does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Store the name following "my name is" and greet it.
    RememberName,
    /// Pick a greeting, personalised with the remembered name.
    Greet,
    /// Record the mood and pick a matching sympathetic reply.
    ReportMood(Mood),
    /// Pick a movie and remember the topic.
    RecommendMovie,
    /// Pick a joke.
    TellJoke,
    /// Pick a farewell.
    SayGoodbye,
    /// Answer "how are you" based on the last mood.
    FollowUpOnMood,
}

/// One entry of the ordered rule list: matches when any phrase is contained.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub phrases: &'static [&'static str],
    pub action: Action,
}

impl Rule {
    /// Tests the rule against already-lowercased text.
    pub fn matches(&self, text: &str) -> bool {
        self.phrases.iter().any(|phrase| text.contains(phrase))
    }
}

/// Rules in priority order; the first match wins.
pub const RULES: [Rule; 8] = [
    Rule {
        phrases: &[NAME_PHRASE],
        action: Action::RememberName,
    },
    Rule {
        phrases: &["hi", "hello", "hey"],
        action: Action::Greet,
    },
    Rule {
        phrases: &["i am sad", "i feel sad"],
        action: Action::ReportMood(Mood::Sad),
    },
    Rule {
        phrases: &["i am happy", "i feel happy"],
        action: Action::ReportMood(Mood::Happy),
    },
    Rule {
        phrases: &["recommend movie"],
        action: Action::RecommendMovie,
    },
    Rule {
        phrases: &["tell me a joke"],
        action: Action::TellJoke,
    },
    Rule {
        phrases: &["bye"],
        action: Action::SayGoodbye,
    },
    Rule {
        phrases: &["how are you"],
        action: Action::FollowUpOnMood,
    },
];

/// Returns the first rule matching `input`, if any.
///
/// # Arguments
/// * `input` - Raw user text; it is lowercased before matching.
pub fn matching_rule(input: &str) -> Option<&'static Rule> {
    let text = input.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&text))
}

/// The second-generation bot: ordered rules plus session memory.
#[derive(Clone, Debug, Default)]
pub struct ContextualResponder {
    table: ResponseTable,
}

impl ContextualResponder {
    /// Creates a responder drawing replies from `table`.
    pub fn new(table: ResponseTable) -> Self {
        Self { table }
    }

    /// Runs `action` for the lowercased `text`.
    fn apply(
        &self,
        action: Action,
        text: &str,
        memory: &mut Memory,
        chooser: &mut dyn Chooser,
    ) -> String {
        match action {
            Action::RememberName => {
                let name = extract_name(text);
                let reply = fill_template(INTRODUCTION_TEMPLATE, &name);
                if !name.is_empty() {
                    tracing::debug!(%name, "remembering name");
                    memory.remember_name(name);
                }
                reply
            }
            Action::Greet => self.personalised(
                Category::Greeting,
                memory.name_or(GREETING_FALLBACK_NAME),
                chooser,
            ),
            Action::ReportMood(mood) => {
                memory.remember_mood(mood);
                tracing::debug!(%mood, "remembering mood");
                let category = match mood {
                    Mood::Sad => Category::Sad,
                    Mood::Happy => Category::Happy,
                };
                self.personalised(category, memory.name_or(DEFAULT_FALLBACK_NAME), chooser)
            }
            Action::RecommendMovie => {
                memory.remember_topic("movie");
                self.table.choose(Category::Movie, chooser).to_string()
            }
            Action::TellJoke => self.table.choose(Category::Joke, chooser).to_string(),
            Action::SayGoodbye => self.personalised(
                Category::Farewell,
                memory.name_or(DEFAULT_FALLBACK_NAME),
                chooser,
            ),
            Action::FollowUpOnMood => match memory.last_mood {
                Some(Mood::Sad) => SAD_FOLLOW_UP.to_string(),
                Some(Mood::Happy) => HAPPY_FOLLOW_UP.to_string(),
                None => NEUTRAL_FOLLOW_UP.to_string(),
            },
        }
    }

    fn personalised(&self, category: Category, name: &str, chooser: &mut dyn Chooser) -> String {
        fill_template(self.table.choose(category, chooser), name)
    }
}

impl Responder for ContextualResponder {
    fn respond(&self, input: &str, memory: &mut Memory, chooser: &mut dyn Chooser) -> String {
        let text = input.to_lowercase();
        match RULES.iter().find(|rule| rule.matches(&text)) {
            Some(rule) => {
                tracing::debug!(action = ?rule.action, "rule matched");
                self.apply(rule.action, &text, memory, chooser)
            }
            None => FALLBACK_REPLY.to_string(),
        }
    }

    fn ends_conversation(&self, input: &str) -> bool {
        input.to_lowercase().contains("bye")
    }
}

/// Takes the text after the last "my name is", trimmed and title-cased.
fn extract_name(text: &str) -> String {
    let tail = text
        .rsplit_once(NAME_PHRASE)
        .map_or("", |(_, after)| after);
    title_case(tail.trim())
}

/// Uppercases the first letter of every run of cased letters and lowercases the rest.
///
/// Uncased characters such as digits, punctuation or CJK ideographs end a word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_lowercase() || ch.is_uppercase() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chooser::ScriptedChooser;

    fn reply(input: &str, memory: &mut Memory) -> String {
        ContextualResponder::default().respond(input, memory, &mut ScriptedChooser::constant(0))
    }

    #[test]
    fn name_is_trimmed_and_title_cased() {
        let mut memory = Memory::new();
        let text = reply("My Name Is   sAM o'neil  ", &mut memory);
        assert_eq!(memory.name.as_deref(), Some("Sam O'Neil"));
        assert_eq!(text, "Nice to meet you, Sam O'Neil!");
    }

    #[test]
    fn name_comes_after_last_phrase() {
        let mut memory = Memory::new();
        reply("my name is bob, no wait, my name is alice", &mut memory);
        assert_eq!(memory.name.as_deref(), Some("Alice"));
    }

    #[test]
    fn empty_name_keeps_previous_one() {
        let mut memory = Memory::new();
        memory.remember_name("Sam");
        let text = reply("my name is   ", &mut memory);
        assert_eq!(memory.name.as_deref(), Some("Sam"));
        assert_eq!(text, "Nice to meet you, !");
    }

    #[test]
    fn empty_name_replies_with_blank_name() {
        let mut memory = Memory::new();
        assert_eq!(reply("my name is", &mut memory), "Nice to meet you, !");
        assert_eq!(memory.name, None);
        assert_eq!(reply("hello", &mut memory), "Hello there! How are you today?");
    }

    #[test]
    fn name_rule_beats_greeting() {
        let mut memory = Memory::new();
        let text = reply("hi my name is Sam", &mut memory);
        assert_eq!(text, "Nice to meet you, Sam!");
        assert_eq!(matching_rule("hi my name is Sam").unwrap().action, Action::RememberName);
    }

    #[test]
    fn greeting_uses_there_then_name() {
        let mut memory = Memory::new();
        assert_eq!(reply("Hello!", &mut memory), "Hello there! How are you today?");
        memory.remember_name("Sam");
        assert_eq!(reply("hey", &mut memory), "Hello Sam! How are you today?");
    }

    #[test]
    fn mood_is_remembered_and_personalised() {
        let mut memory = Memory::new();
        let text = reply("I feel sad today", &mut memory);
        assert_eq!(memory.last_mood, Some(Mood::Sad));
        assert_eq!(text, "I'm sorry to hear that, friend. Want to talk about it?");

        memory.remember_name("Sam");
        let text = reply("i am happy", &mut memory);
        assert_eq!(memory.last_mood, Some(Mood::Happy));
        assert_eq!(text, "Yay! That's awesome, Sam");
    }

    #[test]
    fn movie_sets_topic_without_templating() {
        let mut memory = Memory::new();
        let text = reply("can you recommend movie", &mut memory);
        assert_eq!(text, "I recommend Inception!");
        assert_eq!(memory.last_topic.as_deref(), Some("movie"));
    }

    #[test]
    fn joke_leaves_memory_untouched() {
        let mut memory = Memory::new();
        reply("tell me a joke", &mut memory);
        assert_eq!(memory, Memory::new());
    }

    #[test]
    fn farewell_uses_friend_fallback() {
        let mut memory = Memory::new();
        assert_eq!(reply("bye", &mut memory), "Goodbye, friend! Have a great day!");
    }

    #[test]
    fn follow_up_depends_on_last_mood() {
        let mut memory = Memory::new();
        assert_eq!(reply("how are you", &mut memory), NEUTRAL_FOLLOW_UP);
        reply("i am sad", &mut memory);
        assert_eq!(reply("how are you", &mut memory), SAD_FOLLOW_UP);
        reply("i am happy", &mut memory);
        assert_eq!(reply("how are you", &mut memory), HAPPY_FOLLOW_UP);
    }

    #[test]
    fn unmatched_input_falls_back() {
        let mut memory = Memory::new();
        assert_eq!(reply("what time is it", &mut memory), FALLBACK_REPLY);
        assert!(matching_rule("what time is it").is_none());
    }

    #[test]
    fn greeting_substring_matches_inside_words() {
        assert_eq!(matching_rule("this is fine").unwrap().action, Action::Greet);
    }

    #[test]
    fn farewell_is_checked_before_follow_up() {
        assert_eq!(
            matching_rule("how are you? bye").unwrap().action,
            Action::SayGoodbye
        );
    }

    #[test]
    fn conversation_ends_on_any_bye() {
        let responder = ContextualResponder::default();
        assert!(responder.ends_conversation("OK BYE now"));
        assert!(!responder.ends_conversation("see you"));
    }

    #[test]
    fn title_case_handles_separators() {
        assert_eq!(title_case("mary-jane watson"), "Mary-Jane Watson");
        assert_eq!(title_case("r2d2"), "R2D2");
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("中a"), "中A");
    }
}
