//! Telegram notification and command handling.
//!
//! Provides the price drop alert sender and the `/start` / `/price` bot
//! commands answered from the stored history.

mod command;

pub mod control;
pub mod notifier;

pub use command::{bot_commands, parse_command, CommandParseError, TelegramCommand};
pub use control::{command_response_for_message, TelegramControl};
pub use notifier::{run_command_listener, TelegramConfig, TelegramNotifier};
