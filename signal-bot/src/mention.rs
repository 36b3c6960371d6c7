//! Pure functions for mention handling: span removal, phone normalization, and bot-addressed
//! detection.
//!
//! Used by [`crate::extract`] to turn raw message text into the text handed to commands and the
//! LLM. Mention offsets are code-point indices, so all span arithmetic happens on a `Vec<char>`.

use crate::core::MentionSpan;

/// Strips surrounding whitespace and every internal ASCII space.
pub fn normalize_phone(s: &str) -> String {
    s.trim().replace(' ', "")
}

/// True if `s`, once normalized, is an optional leading `+` followed by one or more ASCII digits.
pub fn looks_like_phone(s: &str) -> bool {
    let clean = normalize_phone(s);
    let digits = clean.strip_prefix('+').unwrap_or(&clean);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Collapses every whitespace run to one space and trims both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes every mention span from `text` and normalizes whitespace.
///
/// Spans are applied highest `start` first (stable among equal starts), so a lower span's offsets
/// still refer to untouched text when its turn comes. `start` is clamped to 0, `start + length`
/// to the text length, and spans starting at or past the end are skipped. Overlapping spans are
/// not reconciled: each is applied to whatever text the previous removals left behind.
pub fn remove_mention_spans(text: &str, spans: &[MentionSpan]) -> String {
    if text.is_empty() || spans.is_empty() {
        return text.trim().to_string();
    }

    let mut ordered: Vec<&MentionSpan> = spans.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut chars: Vec<char> = text.chars().collect();
    for span in ordered {
        let start = span.start.max(0) as usize;
        if start >= chars.len() {
            continue;
        }
        let end = span
            .start
            .max(0)
            .saturating_add(span.length.max(0))
            .min(chars.len() as i64) as usize;
        chars.drain(start..end);
    }

    collapse_whitespace(&chars.into_iter().collect::<String>())
}

/// True if any span points at the bot: by normalized phone number, or by a non-empty UUID equal
/// to a non-empty bot UUID.
pub fn spans_mention_bot(spans: &[MentionSpan], bot_number: &str, bot_uuid: &str) -> bool {
    let bot_number = normalize_phone(bot_number);
    spans.iter().any(|span| {
        let by_number = span
            .number
            .as_deref()
            .filter(|n| !n.is_empty())
            .is_some_and(|n| !bot_number.is_empty() && normalize_phone(n) == bot_number);
        let by_uuid = span
            .uuid
            .as_deref()
            .is_some_and(|u| !u.is_empty() && !bot_uuid.is_empty() && u == bot_uuid);
        by_number || by_uuid
    })
}

/// True if `text` contains `bot_number` as a case-insensitive substring. An empty bot number
/// never matches.
pub fn text_mentions_bot_number(text: &str, bot_number: &str) -> bool {
    !bot_number.is_empty() && text.to_lowercase().contains(&bot_number.to_lowercase())
}

/// Removes every literal occurrence of `bot_number` and trims. Occurrences in ordinary content
/// are removed too.
pub fn strip_bot_number(text: &str, bot_number: &str) -> String {
    if bot_number.is_empty() {
        return text.trim().to_string();
    }
    text.replace(bot_number, "").trim().to_string()
}
