//! Support bot demo: commands, a reply-correlated email prompt, keyboards,
//! and an inline-button callback handler.
//!
//! Needs BOT_TOKEN in the environment (or a .env file). Optional:
//! ACTIVITY_LOG_FILE, TRACE_LOG_FILE, PHOTO_PATH, DOCUMENT_PATH.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use tgkit_core::{init_tracing, ActivityLog, InlineButton, TextFormat, Transport};
use tgkit_telegram::{build_bot, run_polling, TelegramConfig, TelegramTransport};
use update_router::{CallbackRouter, MessageRegistry, UpdateDispatcher};

/// Reply correlation is an exact text match, so the prompt the bot sends and
/// the registered key must be the same string.
const EMAIL_PROMPT: &str = "Enter your email:";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = TelegramConfig::from_env().context("loading bot configuration")?;

    std::fs::create_dir_all("logs").context("creating logs directory")?;
    let trace_log = config
        .trace_log_file
        .clone()
        .unwrap_or_else(|| "logs/support-bot.log".to_string());
    init_tracing(&trace_log)?;

    let activity = ActivityLog::to_file(
        config
            .activity_log_file
            .clone()
            .unwrap_or_else(|| "logs/activity.log".to_string()),
    );

    let bot: teloxide::Bot = build_bot(&config)?;
    let transport: Arc<dyn Transport> =
        Arc::new(TelegramTransport::new(bot.clone(), activity.clone()));

    let mut registry = MessageRegistry::new(transport.clone(), activity.clone());

    registry.on_message_received(|message, _cancel| {
        debug!(chat_id = message.chat_id, text = %message.text, "Observed message");
        async move { Ok(()) }
    });

    {
        let transport = transport.clone();
        registry.register_command("/start", move |chat_id, _context, _cancel| {
            let transport = transport.clone();
            async move {
                transport
                    .send_text(chat_id, "Welcome! I'm your support bot.", TextFormat::Plain)
                    .await?;
                let rows = vec![
                    vec!["/help".to_string(), "/options".to_string()],
                    vec!["/email".to_string()],
                ];
                transport
                    .send_reply_keyboard(chat_id, "Choose an option:", &rows)
                    .await?;
                Ok(())
            }
        });
    }

    {
        let transport = transport.clone();
        registry.register_command("/help", move |chat_id, _context, _cancel| {
            let transport = transport.clone();
            async move {
                transport
                    .send_text(
                        chat_id,
                        "Commands:\n\
                         /start - greeting and keyboard\n\
                         /options - inline buttons\n\
                         /email - leave your email\n\
                         /photo - a picture\n\
                         /doc - the manual",
                        TextFormat::Plain,
                    )
                    .await?;
                Ok(())
            }
        });
    }

    {
        let transport = transport.clone();
        registry.register_command("/options", move |chat_id, _context, _cancel| {
            let transport = transport.clone();
            async move {
                let buttons = vec![
                    vec![InlineButton::callback("Click me!", "button_clicked")],
                    vec![InlineButton::url("Project page", "https://example.com")],
                ];
                transport
                    .send_inline_keyboard(chat_id, "Press a button:", &buttons)
                    .await?;
                Ok(())
            }
        });
    }

    {
        let transport = transport.clone();
        registry.register_command("/email", move |chat_id, _context, _cancel| {
            let transport = transport.clone();
            async move {
                transport
                    .send_text(chat_id, EMAIL_PROMPT, TextFormat::Plain)
                    .await?;
                transport
                    .send_text(
                        chat_id,
                        "(reply to the message above with your address)",
                        TextFormat::Plain,
                    )
                    .await?;
                Ok(())
            }
        });
    }

    {
        let transport = transport.clone();
        registry.register_reply(EMAIL_PROMPT, move |chat_id, _replied, reply, _cancel| {
            let transport = transport.clone();
            async move {
                transport
                    .send_text(
                        chat_id,
                        &format!("Thanks! We will reach you at {}", reply),
                        TextFormat::Plain,
                    )
                    .await?;
                Ok(())
            }
        });
    }

    {
        let transport = transport.clone();
        registry.register_command("/photo", move |chat_id, _context, _cancel| {
            let transport = transport.clone();
            let path = PathBuf::from(
                std::env::var("PHOTO_PATH").unwrap_or_else(|_| "assets/logo.jpg".to_string()),
            );
            async move {
                transport
                    .send_photo(chat_id, &path, "A local picture")
                    .await?;
                Ok(())
            }
        });
    }

    {
        let transport = transport.clone();
        registry.register_command("/doc", move |chat_id, _context, _cancel| {
            let transport = transport.clone();
            let path = PathBuf::from(
                std::env::var("DOCUMENT_PATH").unwrap_or_else(|_| "assets/manual.txt".to_string()),
            );
            async move {
                transport
                    .send_document(chat_id, &path, Some("manual.txt"), "The manual")
                    .await?;
                Ok(())
            }
        });
    }

    let mut callbacks = CallbackRouter::new(transport.clone(), activity.clone());
    {
        let transport = transport.clone();
        callbacks.set_handler(move |query, _cancel| {
            let transport = transport.clone();
            async move {
                transport
                    .answer_callback(&query.id, "You clicked the button!")
                    .await?;
                if let Some(chat_id) = query.chat_id {
                    transport
                        .send_text(chat_id, "Button was clicked!", TextFormat::Plain)
                        .await?;
                }
                Ok(())
            }
        });
    }

    let dispatcher = UpdateDispatcher::new(registry, callbacks, activity.clone());
    run_polling(bot, transport, dispatcher, activity).await
}
