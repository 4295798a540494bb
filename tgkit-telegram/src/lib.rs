//! # tgkit-telegram
//!
//! Telegram connectivity for the bot front end: adapters from teloxide types
//! to the core model, the [`tgkit_core::Transport`] implementation, minimal
//! env config, and the long-poll runner. No routing logic lives here; every
//! received update is handed to an [`update_router::UpdateDispatcher`].

mod adapters;
mod config;
mod runner;
mod transport;

pub use adapters::{update_to_core, TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUserWrapper};
pub use config::{build_bot, TelegramConfig};
pub use runner::run_polling;
pub use transport::TelegramTransport;
