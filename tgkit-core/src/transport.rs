//! Transport facade: the minimal send/receive surface the dispatch layer
//! needs from the messaging platform. Implemented over Telegram in
//! tgkit-telegram; tests substitute recording implementations.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// The bot's own identity as reported by the platform.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub id: i64,
    pub username: String,
}

/// Text formatting applied to an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Markdown,
    Html,
}

/// One inline-keyboard button: a label plus what pressing it does.
#[derive(Debug, Clone)]
pub struct InlineButton {
    pub label: String,
    pub action: InlineAction,
}

#[derive(Debug, Clone)]
pub enum InlineAction {
    /// Sends the payload back as a callback query.
    Callback(String),
    /// Opens the URL.
    Url(String),
}

impl InlineButton {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: InlineAction::Callback(data.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: InlineAction::Url(url.into()),
        }
    }
}

/// Send surface plus startup hygiene calls, consumed by the dispatch layer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_identity(&self) -> Result<BotIdentity>;

    /// Startup hygiene, invoked once before the receive loop.
    async fn delete_webhook(&self) -> Result<()>;
    async fn drop_pending_updates(&self) -> Result<()>;

    async fn send_text(&self, chat_id: i64, text: &str, format: TextFormat) -> Result<()>;
    async fn send_photo(&self, chat_id: i64, path: &Path, caption: &str) -> Result<()>;
    async fn send_document(
        &self,
        chat_id: i64,
        path: &Path,
        file_name: Option<&str>,
        caption: &str,
    ) -> Result<()>;
    /// Sends a reply keyboard: rows of plain-text button labels.
    async fn send_reply_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        rows: &[Vec<String>],
    ) -> Result<()>;
    async fn send_inline_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[Vec<InlineButton>],
    ) -> Result<()>;
    /// Acknowledges an inline-button press. The platform shows a stale
    /// spinner to the user until this arrives.
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()>;
}
