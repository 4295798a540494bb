//! Single entry point for inbound updates.

use tokio_util::sync::CancellationToken;
use tracing::error;

use tgkit_core::{ActivityLog, Update};

use crate::{CallbackRouter, MessageRegistry};

/// Classifies each inbound update and routes it to the message registry or
/// the callback router. This is the top-level fault isolation boundary: a
/// failing downstream path is logged and swallowed so one misbehaving handler
/// can never terminate the receive loop.
pub struct UpdateDispatcher {
    registry: MessageRegistry,
    callbacks: CallbackRouter,
    log: ActivityLog,
}

impl UpdateDispatcher {
    /// Builds the dispatcher over fully-registered components. Registration
    /// is finished before construction; the dispatcher takes ownership.
    pub fn new(registry: MessageRegistry, callbacks: CallbackRouter, log: ActivityLog) -> Self {
        Self {
            registry,
            callbacks,
            log,
        }
    }

    /// Routes one update to exactly one path. Unrecognized update kinds are
    /// ignored by design, not an error.
    pub async fn dispatch(&self, update: Update, cancel: CancellationToken) {
        let outcome = match update {
            Update::Message(message) => self.registry.handle_message(&message, cancel).await,
            Update::Callback(query) => self.callbacks.handle_callback(query, cancel).await,
            Update::Other => Ok(()),
        };

        if let Err(e) = outcome {
            self.log.error(&format!("Error handling update: {}", e));
            error!(error = %e, "Update handling failed");
        }
    }

    /// The owned registry, for callers that drive it directly (tests).
    pub fn registry(&self) -> &MessageRegistry {
        &self.registry
    }
}
