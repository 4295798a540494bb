//! Command and reply-prompt correlation.
//!
//! Commands are keyed by the first whitespace-delimited token of the message,
//! normalized with trim + lowercase. Replies are keyed by the exact text of
//! the bot message the user replied to, which turns conversational flows
//! ("ask for email, then process the reply") into a stateless lookup on the
//! bot's own prior wording. The match is exact by design: a prompt edited
//! even slightly breaks correlation. Known fragility, not fixed here.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use tgkit_core::{ActivityLog, Message, Result, TextFormat, Transport, User};

use crate::HandlerFuture;

const UNKNOWN_COMMAND: &str = "Unknown command.";
const NO_REPLY_HANDLER: &str = "No handler registered for this reply.";
const COMMAND_FAILED: &str = "An error occurred while handling the command.";

/// Handler for a registered command: (chat id, synthesized message context,
/// cancellation signal).
pub type CommandHandler = Arc<dyn Fn(i64, Message, CancellationToken) -> HandlerFuture + Send + Sync>;

/// Handler for a reply to a registered prompt: (chat id, replied-to message,
/// user's reply text, cancellation signal).
pub type ReplyHandler =
    Arc<dyn Fn(i64, Message, String, CancellationToken) -> HandlerFuture + Send + Sync>;

/// Observer invoked for every routed message before any further handling.
pub type MessageObserver = Arc<dyn Fn(Message, CancellationToken) -> HandlerFuture + Send + Sync>;

/// Maps commands and reply prompts to handlers and routes each text message
/// to exactly one of them.
pub struct MessageRegistry {
    transport: Arc<dyn Transport>,
    log: ActivityLog,
    commands: HashMap<String, CommandHandler>,
    replies: HashMap<String, ReplyHandler>,
    observer: Option<MessageObserver>,
}

impl MessageRegistry {
    pub fn new(transport: Arc<dyn Transport>, log: ActivityLog) -> Self {
        Self {
            transport,
            log,
            commands: HashMap::new(),
            replies: HashMap::new(),
            observer: None,
        }
    }

    /// Registers a command handler. The key is trimmed and lowercased before
    /// storage; registering the same key again overwrites the old handler.
    pub fn register_command<F, Fut>(&mut self, command: &str, handler: F)
    where
        F: Fn(i64, Message, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let key = command.trim().to_lowercase();
        self.log.info(&format!("Registered command: {}", key));
        self.commands.insert(
            key,
            Arc::new(move |chat_id, message, cancel| Box::pin(handler(chat_id, message, cancel))),
        );
    }

    /// Registers a reply handler keyed by the exact prompt text the bot sent.
    /// No normalization; overwrites any existing handler for that prompt.
    pub fn register_reply<F, Fut>(&mut self, prompt: &str, handler: F)
    where
        F: Fn(i64, Message, String, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.log
            .info(&format!("Registered reply handler for: {}", prompt));
        self.replies.insert(
            prompt.to_string(),
            Arc::new(move |chat_id, replied, reply, cancel| {
                Box::pin(handler(chat_id, replied, reply, cancel))
            }),
        );
    }

    /// Attaches the message observer. Single slot, last writer wins. The
    /// observer runs before routing; it may perform side effects but cannot
    /// suppress routing, and its failure is only logged.
    pub fn on_message_received<F, Fut>(&mut self, observer: F)
    where
        F: Fn(Message, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.observer = Some(Arc::new(move |message, cancel| {
            Box::pin(observer(message, cancel))
        }));
    }

    /// Routes one text message to exactly one of the reply or command paths.
    pub async fn handle_message(&self, message: &Message, cancel: CancellationToken) -> Result<()> {
        if message.text.is_empty() {
            return Ok(());
        }

        self.log.debug(&format!(
            "Received message: {} from {}",
            message.text, message.chat_id
        ));

        if let Some(observer) = &self.observer {
            if let Err(e) = observer(message.clone(), cancel.clone()).await {
                self.log.error(&format!("Message observer failed: {:#}", e));
            }
        }

        match &message.reply_to {
            Some(replied) => {
                self.handle_reply(message.chat_id, replied, &message.text, cancel)
                    .await
            }
            None => {
                self.handle_command(message.chat_id, &message.text, &message.from, cancel)
                    .await
            }
        }
    }

    /// Handles a reply to `replied`. Only replies to the bot's own messages
    /// are considered; everything else is a no-op.
    pub async fn handle_reply(
        &self,
        chat_id: i64,
        replied: &Message,
        user_reply: &str,
        cancel: CancellationToken,
    ) -> Result<()> {
        self.log.debug(&format!(
            "Bot was replied to: {}, user response: {}",
            replied.text, user_reply
        ));

        if !replied.from.is_bot {
            return Ok(());
        }

        if let Some(handler) = self.replies.get(&replied.text) {
            if let Err(e) = handler(chat_id, replied.clone(), user_reply.to_string(), cancel).await
            {
                self.log.error(&format!(
                    "Reply handler for '{}' failed: {:#}",
                    replied.text, e
                ));
                self.transport
                    .send_text(chat_id, COMMAND_FAILED, TextFormat::Plain)
                    .await?;
            }
            return Ok(());
        }

        if user_reply.starts_with('/') {
            // The user answered a bot prompt with a fresh command. Recover the
            // original requester from the prompt's own reply context when the
            // bot message was itself a reply (one level, never deeper).
            let from = replied
                .reply_to
                .as_ref()
                .map(|original| original.from.clone())
                .unwrap_or_else(|| replied.from.clone());
            return self.handle_command(chat_id, user_reply, &from, cancel).await;
        }

        self.transport
            .send_text(chat_id, NO_REPLY_HANDLER, TextFormat::Plain)
            .await
    }

    /// Looks up the handler for the first token of `text` and invokes it with
    /// a synthesized message context. Handler failures are logged and answered
    /// with a generic chat message; they never propagate.
    pub async fn handle_command(
        &self,
        chat_id: i64,
        text: &str,
        from: &User,
        cancel: CancellationToken,
    ) -> Result<()> {
        let key = text
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();

        let Some(handler) = self.commands.get(&key) else {
            return self
                .transport
                .send_text(chat_id, UNKNOWN_COMMAND, TextFormat::Plain)
                .await;
        };

        let context = Message::synthesized(chat_id, from.clone(), text);
        if let Err(e) = handler(chat_id, context, cancel).await {
            self.log
                .error(&format!("Command '{}' failed: {:#}", key, e));
            self.transport
                .send_text(chat_id, COMMAND_FAILED, TextFormat::Plain)
                .await?;
        }
        Ok(())
    }
}
