//! Unit tests for [`openai_client::mask_token`].
//!
//! API keys are logged as first 7 chars + `***` + last 4 chars; keys of 11 chars or fewer are
//! fully masked.

use openai_client::mask_token;

/// **Test: Short or empty tokens are fully masked.**
#[test]
fn short_tokens_fully_masked() {
    assert_eq!(mask_token(""), "***");
    assert_eq!(mask_token("sk-or-v1"), "***");
    assert_eq!(mask_token("AIzaSyA1234"), "***");
}

/// **Test: A 12-char token shows 7 head and 4 tail chars.**
#[test]
fn twelve_char_token_shows_head_and_tail() {
    assert_eq!(mask_token("sk-or-v1abcd"), "sk-or-v***abcd");
}

/// **Test: Typical OpenRouter key keeps its prefix and last four chars.**
#[test]
fn openrouter_key_masked() {
    let key = "sk-or-v1-0123456789abcdef0123456789abcdef";
    let masked = mask_token(key);
    assert!(masked.starts_with("sk-or-v"));
    assert!(masked.ends_with("cdef"));
    assert_eq!(masked.chars().count(), 7 + 3 + 4);
}

/// **Test: Multi-byte characters do not cause slicing panics.**
#[test]
fn non_ascii_token_masked_by_chars() {
    let masked = mask_token("ключключключключ");
    assert_eq!(masked, "ключклю***ключ");
}
