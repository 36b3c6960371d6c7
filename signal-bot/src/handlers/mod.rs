//! Handler implementations for the dispatch chain: mention gate, `/help`, `/download`, and LLM
//! chat. [`Replier`] routes every outgoing message.

mod chat_handler;
mod download_handler;
mod help_handler;
mod mention_gate;
mod reply;

pub use chat_handler::ChatHandler;
pub use download_handler::{
    DownloadHandler, DOWNLOAD_FAILED_TEXT, DOWNLOAD_PROGRESS_TEXT, DOWNLOAD_USAGE_TEXT,
};
pub use help_handler::{HelpHandler, HELP_TEXT};
pub use mention_gate::MentionGate;
pub use reply::{Replier, GENERIC_ERROR};

/// If trimmed `text` starts with `command` (ASCII case-insensitive), returns the trimmed rest.
pub fn command_args<'a>(text: &'a str, command: &str) -> Option<&'a str> {
    let text = text.trim();
    let head = text.get(..command.len())?;
    if head.eq_ignore_ascii_case(command) {
        Some(text[command.len()..].trim())
    } else {
        None
    }
}
