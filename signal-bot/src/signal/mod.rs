//! signal-cli REST API gateway.

mod client;

pub use client::{mime_for_path, OutgoingQuote, SignalClient};
