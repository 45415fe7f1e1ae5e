//! Telegram notification and command handling.
//!
//! Provides the [`TelegramNotifier`] for sending price alerts and the
//! command listener answering `/start` and `/price`. Both run as background
//! tasks so delivery never blocks a scrape cycle.
//!
//! Requires the `telegram` feature to be enabled.

use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::port::{Event, Notifier};

use super::command::bot_commands;
use super::control::{command_response_for_message, TelegramControl};

/// Configuration for the Telegram bot.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Target chat ID for alerts. Alerts are skipped when `None`.
    pub chat_id: Option<i64>,
}

/// Telegram notifier that sends alerts to a chat.
///
/// Alerts are queued to a background worker; delivery failures are logged
/// by the worker and never reach the caller.
pub struct TelegramNotifier {
    /// Channel sender for queuing outbound notifications. `None` without a chat ID.
    sender: Option<mpsc::UnboundedSender<Event>>,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier.
    ///
    /// Spawns the delivery worker only when a chat ID is configured, so this
    /// must be called from within a Tokio runtime in that case.
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        let Some(chat_id) = config.chat_id else {
            warn!("CHAT_ID is not configured; price alerts will not be sent");
            return Self { sender: None };
        };

        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(telegram_worker(config.bot_token, chat_id, receiver));

        Self {
            sender: Some(sender),
        }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, event: Event) {
        let Some(sender) = &self.sender else {
            warn!("CHAT_ID is not configured; no alert sent");
            return;
        };

        if sender.send(event).is_err() {
            warn!("Telegram notifier channel closed");
        }
    }
}

/// Background worker that sends Telegram messages.
async fn telegram_worker(
    bot_token: String,
    chat_id: i64,
    mut receiver: mpsc::UnboundedReceiver<Event>,
) {
    let bot = Bot::new(bot_token);

    info!(chat_id, "Telegram notifier started");

    while let Some(event) = receiver.recv().await {
        if let Err(e) = bot.send_message(ChatId(chat_id), event.message()).await {
            error!(error = %e, "Error sending alert");
        }
    }

    warn!("Telegram notifier worker shutting down");
}

/// Listen for inbound bot commands until the bot is stopped.
pub async fn run_command_listener(bot_token: String, control: TelegramControl) {
    let bot = Bot::new(bot_token);

    // Register commands with Telegram so they appear in the "/" menu
    if let Err(e) = register_bot_commands(&bot).await {
        warn!(error = %e, "Failed to register bot commands with Telegram");
    }

    info!("Telegram command listener started");

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let control = control.clone();
        async move {
            let Some(text) = msg.text() else {
                return respond(());
            };

            if let Some(response) = command_response_for_message(text, &control) {
                if let Err(e) = bot.send_message(msg.chat.id, response).await {
                    error!(error = %e, "Failed to send Telegram command response");
                }
            }

            respond(())
        }
    })
    .await;
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
