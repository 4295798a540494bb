//! Wraps teloxide::Bot and implements [`tgkit_core::Transport`]. Production
//! code sends through Telegram; tests substitute recording implementations.

use std::path::Path;

use async_trait::async_trait;
use teloxide::payloads::{
    AnswerCallbackQuerySetters, DeleteWebhookSetters, SendDocumentSetters, SendMessageSetters,
    SendPhotoSetters,
};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, KeyboardButton, KeyboardMarkup,
    ParseMode,
};

use tgkit_core::{
    ActivityLog, BotError, BotIdentity, InlineAction, InlineButton, Result, TextFormat, Transport,
};

/// Thin wrapper around teloxide::Bot that implements the transport facade.
/// Every outbound call is recorded in the activity log at Info level.
pub struct TelegramTransport {
    bot: teloxide::Bot,
    log: ActivityLog,
}

impl TelegramTransport {
    pub fn new(bot: teloxide::Bot, log: ActivityLog) -> Self {
        Self { bot, log }
    }

    /// The underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

fn transport_err(e: teloxide::RequestError) -> BotError {
    BotError::Transport(e.to_string())
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn get_identity(&self) -> Result<BotIdentity> {
        let me = self.bot.get_me().await.map_err(transport_err)?;
        Ok(BotIdentity {
            id: me.user.id.0 as i64,
            username: me.user.username.clone().unwrap_or_default(),
        })
    }

    async fn delete_webhook(&self) -> Result<()> {
        self.bot.delete_webhook().await.map_err(transport_err)?;
        Ok(())
    }

    async fn drop_pending_updates(&self) -> Result<()> {
        // Telegram exposes this as a flag on deleteWebhook.
        self.bot
            .delete_webhook()
            .drop_pending_updates(true)
            .await
            .map_err(transport_err)?;
        Ok(())
    }

    async fn send_text(&self, chat_id: i64, text: &str, format: TextFormat) -> Result<()> {
        self.log
            .info(&format!("Sending message to chat {}", chat_id));

        let request = self.bot.send_message(ChatId(chat_id), text.to_string());
        let request = match format {
            TextFormat::Plain => request,
            TextFormat::Markdown => request.parse_mode(ParseMode::MarkdownV2),
            TextFormat::Html => request.parse_mode(ParseMode::Html),
        };
        request.await.map_err(transport_err)?;
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, path: &Path, caption: &str) -> Result<()> {
        self.log.info(&format!("Sending photo to chat {}", chat_id));

        let mut request = self.bot.send_photo(ChatId(chat_id), InputFile::file(path));
        if !caption.is_empty() {
            request = request.caption(caption.to_string());
        }
        request.await.map_err(transport_err)?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        path: &Path,
        file_name: Option<&str>,
        caption: &str,
    ) -> Result<()> {
        self.log
            .info(&format!("Sending document to chat {}", chat_id));

        let mut file = InputFile::file(path);
        if let Some(name) = file_name {
            file = file.file_name(name.to_string());
        }
        let mut request = self.bot.send_document(ChatId(chat_id), file);
        if !caption.is_empty() {
            request = request.caption(caption.to_string());
        }
        request.await.map_err(transport_err)?;
        Ok(())
    }

    async fn send_reply_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        rows: &[Vec<String>],
    ) -> Result<()> {
        self.log
            .info(&format!("Sending reply keyboard to chat {}", chat_id));

        let keyboard = KeyboardMarkup::new(
            rows.iter()
                .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone()))),
        )
        .resize_keyboard();
        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .reply_markup(keyboard)
            .await
            .map_err(transport_err)?;
        Ok(())
    }

    async fn send_inline_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[Vec<InlineButton>],
    ) -> Result<()> {
        self.log
            .info(&format!("Sending inline keyboard to chat {}", chat_id));

        let mut keyboard_rows = Vec::with_capacity(buttons.len());
        for row in buttons {
            let mut keyboard_row = Vec::with_capacity(row.len());
            for button in row {
                let converted = match &button.action {
                    InlineAction::Callback(data) => {
                        InlineKeyboardButton::callback(button.label.clone(), data.clone())
                    }
                    InlineAction::Url(raw) => {
                        let parsed = url::Url::parse(raw).map_err(|e| {
                            BotError::Transport(format!("Invalid button url {}: {}", raw, e))
                        })?;
                        InlineKeyboardButton::url(button.label.clone(), parsed)
                    }
                };
                keyboard_row.push(converted);
            }
            keyboard_rows.push(keyboard_row);
        }

        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .reply_markup(InlineKeyboardMarkup::new(keyboard_rows))
            .await
            .map_err(transport_err)?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()> {
        self.bot
            .answer_callback_query(teloxide::types::CallbackQueryId(callback_id.to_string()))
            .text(text.to_string())
            .await
            .map_err(transport_err)?;
        Ok(())
    }
}
