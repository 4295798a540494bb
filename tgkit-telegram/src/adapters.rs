//! Adapters from Telegram (teloxide) types to the core update model.
//! Depends only on teloxide and tgkit_core type definitions.

use teloxide::types::{MaybeInaccessibleMessage, UpdateKind};

use tgkit_core::{CallbackQuery, Message, ToCoreMessage, ToCoreUser, Update, User};

/// Reply chains are converted one nested level deep, which is also all the
/// platform delivers inside an update.
const REPLY_DEPTH: u8 = 1;

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl ToCoreUser for TelegramUserWrapper<'_> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            first_name: self.0.first_name.clone(),
            last_name: self.0.last_name.clone(),
            username: self.0.username.clone(),
            is_bot: self.0.is_bot,
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl ToCoreMessage for TelegramMessageWrapper<'_> {
    fn to_core(&self) -> Message {
        convert_message(self.0, REPLY_DEPTH)
    }
}

fn convert_message(message: &teloxide::types::Message, reply_depth: u8) -> Message {
    let reply_to = if reply_depth == 0 {
        None
    } else {
        message
            .reply_to_message()
            .map(|replied| Box::new(convert_message(replied, reply_depth - 1)))
    };

    Message {
        chat_id: message.chat.id.0,
        from: message
            .from
            .as_ref()
            .map(|user| TelegramUserWrapper(user).to_core())
            .unwrap_or_else(anonymous_user),
        text: message.text().unwrap_or("").to_string(),
        reply_to,
    }
}

/// Placeholder sender for channel posts and other messages without a `from`.
fn anonymous_user() -> User {
    User {
        id: 0,
        first_name: String::new(),
        last_name: None,
        username: None,
        is_bot: false,
    }
}

/// Wraps a teloxide CallbackQuery for conversion to core [`CallbackQuery`].
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl TelegramCallbackWrapper<'_> {
    pub fn to_core(&self) -> CallbackQuery {
        let query = self.0;
        CallbackQuery {
            id: query.id.to_string(),
            data: query.data.clone().unwrap_or_default(),
            from: TelegramUserWrapper(&query.from).to_core(),
            chat_id: query.message.as_ref().map(|m| m.chat().id.0),
            message: query.message.as_ref().and_then(|m| match m {
                MaybeInaccessibleMessage::Regular(message) => {
                    Some(Box::new(convert_message(message, REPLY_DEPTH)))
                }
                MaybeInaccessibleMessage::Inaccessible(_) => None,
            }),
        }
    }
}

/// Converts one inbound teloxide update into the core union. Kinds the front
/// end does not handle become [`Update::Other`].
pub fn update_to_core(update: &teloxide::types::Update) -> Update {
    match &update.kind {
        UpdateKind::Message(message) => Update::Message(TelegramMessageWrapper(message).to_core()),
        UpdateKind::CallbackQuery(query) => {
            Update::Callback(TelegramCallbackWrapper(query).to_core())
        }
        _ => Update::Other,
    }
}
