//! Bot initialization and command list
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command menu registration

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Я умею:")]
pub enum Command {
    #[command(description = "открыть школьное приложение")]
    Start,
    #[command(description = "вернуться в главное меню")]
    Menu,
}

/// Creates a Bot instance from `BOT_TOKEN` / `TELOXIDE_TOKEN`
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(AppError::Anyhow)` - Token missing or HTTP client could not be built
pub fn create_bot() -> AppResult<Bot> {
    bot_with_token(&config::BOT_TOKEN)
}

fn bot_with_token(token: &str) -> AppResult<Bot> {
    if token.trim().is_empty() {
        return Err(AppError::Anyhow(anyhow::anyhow!("BOT_TOKEN (or TELOXIDE_TOKEN) is not set")));
    }

    let client = teloxide::net::default_reqwest_settings()
        .timeout(config::network::timeout())
        .build()
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

    Ok(Bot::with_client(token, client))
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> AppResult<()> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}
