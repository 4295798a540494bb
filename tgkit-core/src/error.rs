//! Error types for the bot front end.
//!
//! [`BotError`] is the library-level taxonomy. Registered handlers return
//! `anyhow::Result` instead; their failures are recovered at the invocation
//! points and never surface as [`BotError`].

use thiserror::Error;

/// Top-level error for the front end (config, transport, handler, storage).
#[derive(Error, Debug)]
pub enum BotError {
    /// Fatal at startup only (e.g. missing credential).
    #[error("Config error: {0}")]
    Config(String),

    /// A platform API call failed. Recovered and logged at the dispatch
    /// boundary; the operation is abandoned.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A registered handler failed. Recovered at the invocation point.
    #[error("Handler error: {0}")]
    Handler(String),

    /// The log storage sink failed. Swallowed inside the batcher.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
