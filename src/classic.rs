//! The first-generation bot: a keyword table with no memory.

use crate::chooser::{pick, Chooser};
use crate::memory::Memory;
use crate::responder::{Responder, FALLBACK_REPLY};

/// Keywords in match order, each with its candidate replies.
const KEYWORD_REPLIES: [(&str, &[&str]); 7] = [
    ("hi", &["Hello!", "Hi there!", "Hey! How are you?"]),
    ("hello", &["Hi!", "Hello!", "Hey! Nice to see you!"]),
    (
        "how are you",
        &["I'm good, thanks! How about you?", "Doing well! What about you?"],
    ),
    (
        "i am sad",
        &[
            "I'm sorry to hear that. Do you want to talk about it?",
            "Oh no! I hope things get better soon.",
        ],
    ),
    ("i am happy", &["Yay! That's great to hear", "Awesome! Keep smiling!"]),
    (
        "recommend movie",
        &[
            "I recommend Inception!",
            "Try watching The Pursuit of Happyness.",
            "You might like Interstellar.",
        ],
    ),
    ("bye", &["Goodbye! Have a great day!", "See you later! Take care!"]),
];

/// Keyword-table responder; ignores memory entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassicResponder;

impl ClassicResponder {
    pub fn new() -> Self {
        Self
    }

    /// Returns the first keyword contained in `input`, in table order.
    pub fn matching_keyword(input: &str) -> Option<&'static str> {
        let text = input.to_lowercase();
        KEYWORD_REPLIES
            .iter()
            .map(|(keyword, _)| *keyword)
            .find(|keyword| text.contains(keyword))
    }
}

impl Responder for ClassicResponder {
    fn respond(&self, input: &str, _memory: &mut Memory, chooser: &mut dyn Chooser) -> String {
        let text = input.to_lowercase();
        KEYWORD_REPLIES
            .iter()
            .find(|(keyword, _)| text.contains(keyword))
            .and_then(|(_, replies)| pick(chooser, replies))
            .map_or_else(|| FALLBACK_REPLY.to_string(), |reply| reply.to_string())
    }

    /// Only a bare "bye", in any case, ends a classic conversation.
    fn ends_conversation(&self, input: &str) -> bool {
        input.to_lowercase() == "bye"
    }

    /// The first bot answered immediately.
    fn simulates_typing(&self) -> bool {
        false
    }
}
