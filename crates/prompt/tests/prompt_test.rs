//! Unit tests for prompt building (`frame_with_quote`, `join_system_prompt`, `to_messages`).
//!
//! External interactions: none (pure function tests).

use prompt::{
    frame_with_quote, join_system_prompt, to_messages, ChatMessage, MessageRole,
    DEFAULT_SYSTEM_MESSAGE,
};

/// **Test: Without a quote the user text is passed through unchanged.**
#[test]
fn frame_without_quote_returns_text() {
    assert_eq!(frame_with_quote(None, "what's up?"), "what's up?");
}

/// **Test: An empty quote is treated as absent.**
#[test]
fn frame_with_empty_quote_returns_text() {
    assert_eq!(frame_with_quote(Some(""), "hello"), "hello");
}

/// **Test: A quote is placed in a context line followed by a blank line and the user message.**
#[test]
fn frame_with_quote_adds_context() {
    let out = frame_with_quote(Some("What is the weather like?"), "summarize");
    assert_eq!(
        out,
        "Context (replying to): \"What is the weather like?\"\n\nUser message: summarize"
    );
}

/// **Test: System prompt is joined with a newline; blank system prompt is dropped.**
#[test]
fn join_system_prompt_variants() {
    assert_eq!(join_system_prompt(Some("Be brief."), "hi"), "Be brief.\nhi");
    assert_eq!(join_system_prompt(Some("   "), "hi"), "hi");
    assert_eq!(join_system_prompt(None, "hi"), "hi");
}

/// **Test: to_messages emits system then user; without system only the user message.**
#[test]
fn to_messages_orders_roles() {
    let msgs = to_messages(Some(DEFAULT_SYSTEM_MESSAGE), "hello");
    assert_eq!(
        msgs,
        vec![
            ChatMessage::system(DEFAULT_SYSTEM_MESSAGE),
            ChatMessage::user("hello")
        ]
    );

    let msgs = to_messages(None, "hello");
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].role, MessageRole::User);
}
