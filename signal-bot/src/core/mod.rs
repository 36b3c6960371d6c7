//! Core types and traits: Handler, ChatGateway, Message, HandlerResponse, error, logger.
//! Transport-agnostic.

pub mod error;
pub mod gateway;
pub mod logger;
pub mod types;

pub use error::{BotError, HandlerError, Result};
pub use gateway::ChatGateway;
pub use logger::init_tracing;
pub use types::{
    DataMessage, Envelope, EnvelopeWrapper, GroupInfo, Handler, HandlerResponse, MentionSpan,
    Message, Quote, QuotePayload,
};
