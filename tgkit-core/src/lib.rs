//! # tgkit-core
//!
//! Core types and traits for the bot front end: the update model ([`Update`],
//! [`Message`], [`CallbackQuery`]), the [`Transport`] facade the dispatch layer
//! sends through, the batched [`ActivityLog`], and tracing initialization.
//! Transport-agnostic; used by update-router and tgkit-telegram.

pub mod activity;
pub mod error;
pub mod logger;
pub mod transport;
pub mod types;

pub use activity::{ActivityLog, FileLogSink, LogLevel, LogSink};
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use transport::{BotIdentity, InlineAction, InlineButton, TextFormat, Transport};
pub use types::{CallbackQuery, Message, ToCoreMessage, ToCoreUser, Update, User};
