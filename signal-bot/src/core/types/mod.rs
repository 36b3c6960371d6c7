//! Core types: inbound event schema, extracted message, handler response, and Handler trait.

mod event;
mod handler;
mod message;
mod response;

pub use event::{DataMessage, Envelope, EnvelopeWrapper, GroupInfo, MentionSpan, QuotePayload};
pub use handler::Handler;
pub use message::{Message, Quote};
pub use response::HandlerResponse;
