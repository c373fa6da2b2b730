//! End-to-end conversations through the public API.

use std::io::Cursor;

use chatbuddy::chooser::{RandomChooser, ScriptedChooser};
use chatbuddy::config::InputMode;
use chatbuddy::memory::{Memory, Mood};
use chatbuddy::responder::{
    ContextualResponder, Responder, FALLBACK_REPLY, HAPPY_FOLLOW_UP, NEUTRAL_FOLLOW_UP,
    SAD_FOLLOW_UP,
};
use chatbuddy::responses::{Category, ResponseTable};
use chatbuddy::session::ChatSession;

fn responder() -> ContextualResponder {
    ContextualResponder::default()
}

#[test]
fn introduced_name_is_title_cased_whatever_the_case() {
    for input in ["my name is jane doe", "MY NAME IS JANE DOE", "Well, My name is   jAnE dOe "] {
        let mut memory = Memory::new();
        responder().respond(input, &mut memory, &mut ScriptedChooser::constant(0));
        assert_eq!(memory.name.as_deref(), Some("Jane Doe"), "input: {input}");
    }
}

#[test]
fn greetings_use_there_until_a_name_is_known() {
    let responder = responder();
    let mut memory = Memory::new();
    for pick in 0..3 {
        let reply = responder.respond("hey", &mut memory, &mut ScriptedChooser::constant(pick));
        assert!(reply.contains("there"), "{reply}");
    }
    responder.respond("my name is sam", &mut memory, &mut ScriptedChooser::constant(0));
    for pick in 0..3 {
        let reply = responder.respond("hello", &mut memory, &mut ScriptedChooser::constant(pick));
        assert!(reply.contains("Sam"), "{reply}");
        assert!(!reply.contains("there"), "{reply}");
    }
}

#[test]
fn name_rule_has_priority_over_greeting() {
    let mut memory = Memory::new();
    let reply = responder().respond(
        "hi my name is Sam",
        &mut memory,
        &mut ScriptedChooser::constant(0),
    );
    assert_eq!(reply, "Nice to meet you, Sam!");
    assert_eq!(memory.name.as_deref(), Some("Sam"));
}

#[test]
fn how_are_you_follows_reported_mood() {
    let responder = responder();
    let mut chooser = ScriptedChooser::constant(0);

    let mut memory = Memory::new();
    assert_eq!(responder.respond("how are you", &mut memory, &mut chooser), NEUTRAL_FOLLOW_UP);

    responder.respond("i am sad", &mut memory, &mut chooser);
    assert_eq!(memory.last_mood, Some(Mood::Sad));
    assert_eq!(responder.respond("how are you", &mut memory, &mut chooser), SAD_FOLLOW_UP);

    responder.respond("I feel happy", &mut memory, &mut chooser);
    assert_eq!(responder.respond("how are you", &mut memory, &mut chooser), HAPPY_FOLLOW_UP);
}

#[test]
fn unmatched_input_returns_exact_fallback() {
    let mut memory = Memory::new();
    let reply = responder().respond("what time is it", &mut memory, &mut RandomChooser::seeded(1));
    assert_eq!(reply, FALLBACK_REPLY);
    assert_eq!(memory, Memory::new());
}

#[test]
fn fixed_choices_are_repeatable() {
    let responder = responder();
    let mut memory = Memory::new();
    let mut chooser = ScriptedChooser::constant(1);
    let first = responder.respond("tell me a joke", &mut memory, &mut chooser);
    let second = responder.respond("tell me a joke", &mut memory, &mut chooser);
    assert_eq!(first, second);
    assert_eq!(first, ResponseTable::default().templates(Category::Joke)[1]);
}

#[test]
fn seeded_sessions_replay_identically() {
    let script = "hello\nrecommend movie\ntell me a joke\nbye\n";
    let run = || {
        let mut chat = ChatSession::new(
            Box::new(responder()),
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
        )
        .with_mode(InputMode::Text)
        .with_chooser(Box::new(RandomChooser::seeded(2025)));
        chat.run().unwrap();
        String::from_utf8(chat.into_output()).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn custom_table_flows_into_replies() {
    let table = ResponseTable::from_json(r#"{ "farewell": ["Ciao, {name}."] }"#).unwrap();
    let responder = ContextualResponder::new(table);
    let mut memory = Memory::new();
    let mut chooser = ScriptedChooser::constant(0);
    responder.respond("my name is luca", &mut memory, &mut chooser);
    assert_eq!(responder.respond("bye", &mut memory, &mut chooser), "Ciao, Luca.");
}
