//! Telegram adapter - operator and user notifications via the Bot API.

mod bot_notifier;

pub use bot_notifier::TelegramNotifier;
