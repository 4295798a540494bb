//! Long-poll runner: startup hygiene, then every received update is converted
//! to the core model and handed to the [`UpdateDispatcher`].

use std::sync::Arc;

use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::info;

use tgkit_core::{ActivityLog, Transport};
use update_router::UpdateDispatcher;

use crate::adapters::update_to_core;

async fn on_update(
    update: teloxide::types::Update,
    dispatcher: Arc<UpdateDispatcher>,
    cancel: CancellationToken,
) -> ResponseResult<()> {
    dispatcher.dispatch(update_to_core(&update), cancel).await;
    Ok(())
}

/// Runs the bot until the process is stopped (ctrl-c).
///
/// Before entering the receive loop: fetch the bot identity, delete any
/// webhook, and drop pending updates, as startup hygiene. Updates are
/// dispatched sequentially; the dispatcher isolates handler failures, and
/// transport-level receive errors go to the logging error handler. On exit
/// the activity log gets a final flush.
pub async fn run_polling(
    bot: teloxide::Bot,
    transport: Arc<dyn Transport>,
    dispatcher: UpdateDispatcher,
    log: ActivityLog,
) -> anyhow::Result<()> {
    let identity = transport.get_identity().await?;
    transport.delete_webhook().await?;
    transport.drop_pending_updates().await?;

    log.info(&format!("Bot started: {}", identity.username));
    info!(username = %identity.username, "Bot started");

    let cancel = CancellationToken::new();
    let dispatcher = Arc::new(dispatcher);

    Dispatcher::builder(bot, dptree::entry().endpoint(on_update))
        .dependencies(dptree::deps![dispatcher, cancel.clone()])
        .error_handler(LoggingErrorHandler::with_custom_text("Receive loop error"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    cancel.cancel();
    log.info("Bot stopped");
    log.flush().await;
    info!("Bot stopped");

    Ok(())
}
