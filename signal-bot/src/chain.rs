//! # Handler chain
//!
//! Dispatches one extracted message. All `before` hooks run in order (any false drops the
//! message); then `handle` runs until a handler returns Stop or Reply; then all `after` hooks run
//! in reverse with the final response.

use crate::core::{Handler, HandlerResponse, Message, Result};
use crate::extract::target_label;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Chain of handlers: before (all) → handle (until Stop/Reply) → after (reverse).
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    #[instrument(skip(self, message), fields(event_hash = %message.event_hash))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let target = target_label(message);

        for h in &self.handlers {
            if !h.before(message).await? {
                debug!(
                    target = %target,
                    handler = h.name(),
                    "before returned false, chain stopped"
                );
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for h in &self.handlers {
            let response = h.handle(message).await?;
            debug!(handler = h.name(), response = ?response, "handler processed");
            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    let reply_len = match &response {
                        HandlerResponse::Reply(s) => Some(s.len()),
                        _ => None,
                    };
                    info!(
                        target = %target,
                        handler = h.name(),
                        reply_len = ?reply_len,
                        "handler chain stopped by handler"
                    );
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue => {}
            }
        }

        for h in self.handlers.iter().rev() {
            h.after(message, &final_response).await?;
        }

        Ok(final_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        allow: bool,
        response: HandlerResponse,
    }

    #[async_trait]
    impl Handler for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn before(&self, _message: &Message) -> Result<bool> {
            self.log.lock().unwrap().push(format!("before:{}", self.name));
            Ok(self.allow)
        }

        async fn handle(&self, _message: &Message) -> Result<HandlerResponse> {
            self.log.lock().unwrap().push(format!("handle:{}", self.name));
            Ok(self.response.clone())
        }

        async fn after(&self, _message: &Message, response: &HandlerResponse) -> Result<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("after:{}:{:?}", self.name, response));
            Ok(())
        }
    }

    fn recorder(
        name: &'static str,
        log: &Arc<Mutex<Vec<String>>>,
        allow: bool,
        response: HandlerResponse,
    ) -> Arc<dyn Handler> {
        Arc::new(Recorder {
            name,
            log: log.clone(),
            allow,
            response,
        })
    }

    #[tokio::test]
    async fn runs_until_reply_then_after_in_reverse() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HandlerChain::new()
            .add_handler(recorder("a", &log, true, HandlerResponse::Continue))
            .add_handler(recorder("b", &log, true, HandlerResponse::Reply("x".into())))
            .add_handler(recorder("c", &log, true, HandlerResponse::Continue));

        let resp = chain.handle(&Message::default()).await.unwrap();

        assert_eq!(resp, HandlerResponse::Reply("x".into()));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "before:a",
                "before:b",
                "before:c",
                "handle:a",
                "handle:b",
                "after:c:Reply(\"x\")",
                "after:b:Reply(\"x\")",
                "after:a:Reply(\"x\")",
            ]
        );
    }

    #[tokio::test]
    async fn before_false_stops_everything() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HandlerChain::new()
            .add_handler(recorder("gate", &log, false, HandlerResponse::Continue))
            .add_handler(recorder("b", &log, true, HandlerResponse::Continue));

        let resp = chain.handle(&Message::default()).await.unwrap();

        assert_eq!(resp, HandlerResponse::Stop);
        assert_eq!(*log.lock().unwrap(), vec!["before:gate"]);
    }

    #[tokio::test]
    async fn empty_chain_continues() {
        let chain = HandlerChain::new();
        assert!(chain.is_empty());
        assert_eq!(
            chain.handle(&Message::default()).await.unwrap(),
            HandlerResponse::Continue
        );
    }
}
