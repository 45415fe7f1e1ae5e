//! Telegram command execution against the stored price history.

use std::sync::Arc;

use tracing::debug;

use crate::port::HistoryStore;

use super::command::{parse_command, CommandParseError, TelegramCommand};

/// Reply to `/start` and `/help`.
pub const WELCOME_TEXT: &str = "Welcome to the Price Tracker Bot!\n\n\
    Tutorial:\n\
    - Use /price to get the current price.\n\
    - I'll automatically alert the configured chat if the price drops below the previous one.";

/// Reply to `/price` when nothing has been recorded yet.
pub const NO_DATA_TEXT: &str = "No price data available yet.";

/// Read-only command executor. Loads the history fresh on every query.
#[derive(Clone)]
pub struct TelegramControl {
    store: Arc<dyn HistoryStore>,
}

impl TelegramControl {
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Execute a command and return the reply text.
    #[must_use]
    pub fn execute(&self, command: TelegramCommand) -> String {
        match command {
            TelegramCommand::Start | TelegramCommand::Help => WELCOME_TEXT.to_string(),
            TelegramCommand::Price => self.current_price(),
        }
    }

    fn current_price(&self) -> String {
        match self.store.load().latest() {
            Some(latest) => format!("Current price: {}", latest.price),
            None => NO_DATA_TEXT.to_string(),
        }
    }
}

/// Process a message and return a reply if it is a known command.
///
/// Plain text and unknown commands get no reply.
pub fn command_response_for_message(text: &str, control: &TelegramControl) -> Option<String> {
    match parse_command(text) {
        Ok(command) => Some(control.execute(command)),
        Err(CommandParseError::NotACommand) => None,
        Err(err) => {
            debug!(error = %err, "Ignoring Telegram message");
            None
        }
    }
}
