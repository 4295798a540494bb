//! Shared test doubles: a recording [`Transport`], an in-memory [`LogSink`],
//! and message builders.

// Each test binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tgkit_core::{
    ActivityLog, BotError, BotIdentity, InlineButton, LogSink, Message, Result, TextFormat,
    Transport, User,
};

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentCall {
    Text { chat_id: i64, text: String },
    AnswerCallback { callback_id: String, text: String },
    Other(&'static str),
}

/// Transport that records every outbound call instead of talking to Telegram.
/// With `fail_sends`, every send returns a transport error after recording.
pub struct RecordingTransport {
    pub calls: Mutex<Vec<SentCall>>,
    pub fail_sends: bool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_sends: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_sends: true,
        })
    }

    pub fn calls(&self) -> Vec<SentCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SentCall::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: SentCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_sends {
            return Err(BotError::Transport("recording transport set to fail".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get_identity(&self) -> Result<BotIdentity> {
        Ok(BotIdentity {
            id: 42,
            username: "test_bot".to_string(),
        })
    }

    async fn delete_webhook(&self) -> Result<()> {
        self.record(SentCall::Other("delete_webhook"))
    }

    async fn drop_pending_updates(&self) -> Result<()> {
        self.record(SentCall::Other("drop_pending_updates"))
    }

    async fn send_text(&self, chat_id: i64, text: &str, _format: TextFormat) -> Result<()> {
        self.record(SentCall::Text {
            chat_id,
            text: text.to_string(),
        })
    }

    async fn send_photo(&self, _chat_id: i64, _path: &Path, _caption: &str) -> Result<()> {
        self.record(SentCall::Other("send_photo"))
    }

    async fn send_document(
        &self,
        _chat_id: i64,
        _path: &Path,
        _file_name: Option<&str>,
        _caption: &str,
    ) -> Result<()> {
        self.record(SentCall::Other("send_document"))
    }

    async fn send_reply_keyboard(
        &self,
        _chat_id: i64,
        _text: &str,
        _rows: &[Vec<String>],
    ) -> Result<()> {
        self.record(SentCall::Other("send_reply_keyboard"))
    }

    async fn send_inline_keyboard(
        &self,
        _chat_id: i64,
        _text: &str,
        _buttons: &[Vec<InlineButton>],
    ) -> Result<()> {
        self.record(SentCall::Other("send_inline_keyboard"))
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()> {
        self.record(SentCall::AnswerCallback {
            callback_id: callback_id.to_string(),
            text: text.to_string(),
        })
    }
}

/// In-memory log sink; tests flush the activity log and assert on its lines.
pub struct MemorySink {
    batches: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(Vec::new()),
        })
    }

    pub fn lines(&self) -> Vec<String> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .flat_map(|batch| batch.lines().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    async fn append(&self, batch: &str) -> std::io::Result<()> {
        self.batches.lock().unwrap().push(batch.to_string());
        Ok(())
    }
}

/// Activity log backed by a fresh [`MemorySink`].
pub fn memory_log() -> (ActivityLog, Arc<MemorySink>) {
    let sink = MemorySink::new();
    (ActivityLog::new(sink.clone()), sink)
}

pub fn test_user(id: i64) -> User {
    User {
        id,
        first_name: "Test".to_string(),
        last_name: None,
        username: Some(format!("user{}", id)),
        is_bot: false,
    }
}

pub fn bot_user() -> User {
    User {
        id: 42,
        first_name: "Bot".to_string(),
        last_name: None,
        username: Some("test_bot".to_string()),
        is_bot: true,
    }
}

pub fn text_message(chat_id: i64, text: &str) -> Message {
    Message {
        chat_id,
        from: test_user(123),
        text: text.to_string(),
        reply_to: None,
    }
}

/// A user message replying to `replied`.
pub fn reply_message(chat_id: i64, text: &str, replied: Message) -> Message {
    Message {
        chat_id,
        from: test_user(123),
        text: text.to_string(),
        reply_to: Some(Box::new(replied)),
    }
}

/// A bot message with the given prompt text (the reply-correlation key).
pub fn bot_message(chat_id: i64, text: &str) -> Message {
    Message {
        chat_id,
        from: bot_user(),
        text: text.to_string(),
        reply_to: None,
    }
}
