//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! Handlers only translate between teloxide types and the school module.

mod schema;
mod types;

pub use schema::schema;
pub use types::{account_from_message, account_from_user, HandlerDeps, HandlerError};
