//! Core update model: user, message, callback query, and the inbound update union.

use serde::{Deserialize, Serialize};

/// Sender identity as reported by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub is_bot: bool,
}

/// A text message with its chat, sender, and optional reply context.
///
/// `reply_to` is the message this one replies to. The platform delivers at
/// most one nested level, which is all the reply correlation needs: the
/// replied-to message plus, when the bot itself replied to someone, that
/// message's own `reply_to` carrying the original requester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub chat_id: i64,
    pub from: User,
    pub text: String,
    pub reply_to: Option<Box<Message>>,
}

/// An inline-button press. `id` is the opaque acknowledgement token the
/// platform expects back within its timeout window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub data: String,
    pub from: User,
    pub chat_id: Option<i64>,
    pub message: Option<Box<Message>>,
}

/// One inbound event from the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Update {
    Message(Message),
    Callback(CallbackQuery),
    /// Update kinds the front end does not handle. Ignored, not an error.
    Other,
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

impl Message {
    /// A synthesized message context: chat, sender, and full text, with no
    /// reply chain attached.
    pub fn synthesized(chat_id: i64, from: User, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            from,
            text: text.into(),
            reply_to: None,
        }
    }
}
