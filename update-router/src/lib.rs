//! # update-router
//!
//! Routes inbound updates to registered handlers: [`MessageRegistry`] owns
//! command and reply-prompt correlation, [`CallbackRouter`] owns inline-button
//! presses, and [`UpdateDispatcher`] is the single fault-isolating entry point
//! the receive loop feeds.
//!
//! Registration happens during setup, before the receive loop starts; the
//! registries are plain maps without interior locking, and live registration
//! during traffic is out of scope.

mod callback;
mod dispatcher;
mod registry;

use std::future::Future;
use std::pin::Pin;

pub use callback::{CallbackHandler, CallbackRouter};
pub use dispatcher::UpdateDispatcher;
pub use registry::{CommandHandler, MessageObserver, MessageRegistry, ReplyHandler};

/// Boxed future returned by every registered handler. Handler failures are
/// recovered at the invocation points and never propagate out of the router.
pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
