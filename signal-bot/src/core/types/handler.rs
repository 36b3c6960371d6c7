//! Handler trait.

use async_trait::async_trait;

use super::{message::Message, response::HandlerResponse};

/// One step of the dispatch chain with optional before / handle / after hooks.
///
/// The chain runs every `before` (any `false` stops it), then `handle` until one returns Stop or
/// Reply, then every `after` in reverse order with the final response.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Short name used in chain logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Gate before the handle phase. Return false to drop the message.
    async fn before(&self, _message: &Message) -> crate::core::error::Result<bool> {
        Ok(true)
    }

    async fn handle(&self, _message: &Message) -> crate::core::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }

    async fn after(
        &self,
        _message: &Message,
        _response: &HandlerResponse,
    ) -> crate::core::error::Result<()> {
        Ok(())
    }
}
