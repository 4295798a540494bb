//! Inline-button callback routing.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use tgkit_core::{ActivityLog, CallbackQuery, Result, Transport};

use crate::HandlerFuture;

const NO_CALLBACK_HANDLER: &str = "No handler registered.";

/// Handler for an inline-button press.
pub type CallbackHandler = Arc<dyn Fn(CallbackQuery, CancellationToken) -> HandlerFuture + Send + Sync>;

/// Routes callback events to the single subscribed handler, or acknowledges
/// them with a default answer so the platform never waits on a press.
pub struct CallbackRouter {
    transport: Arc<dyn Transport>,
    log: ActivityLog,
    handler: Option<CallbackHandler>,
}

impl CallbackRouter {
    pub fn new(transport: Arc<dyn Transport>, log: ActivityLog) -> Self {
        Self {
            transport,
            log,
            handler: None,
        }
    }

    /// Subscribes the external callback handler. Single slot, last writer
    /// wins: registering again replaces the previous handler.
    pub fn set_handler<F, Fut>(&mut self, handler: F)
    where
        F: Fn(CallbackQuery, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.handler = Some(Arc::new(move |query, cancel| {
            Box::pin(handler(query, cancel))
        }));
    }

    /// Handles one callback event. A subscribed handler is awaited and its
    /// failure only logged; without one the press is acknowledged with a
    /// default answer. The platform must always receive some acknowledgement
    /// within its timeout window, so a failed answer surfaces as a transport
    /// error for the dispatch boundary to log.
    pub async fn handle_callback(
        &self,
        query: CallbackQuery,
        cancel: CancellationToken,
    ) -> Result<()> {
        self.log
            .debug(&format!("Callback received: {}", query.data));

        match &self.handler {
            Some(handler) => {
                if let Err(e) = handler(query, cancel).await {
                    self.log.error(&format!("Callback handler failed: {:#}", e));
                }
                Ok(())
            }
            None => {
                self.transport
                    .answer_callback(&query.id, NO_CALLBACK_HANDLER)
                    .await
            }
        }
    }
}
