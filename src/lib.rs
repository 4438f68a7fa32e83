//! Schooldesk - Telegram front-end for a school information Mini App
//!
//! The bot answers structured requests from the Mini App with section content
//! (schedule, homework, grades, announcements) and collects feedback.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors and logging
//! - `storage`: SQLite pool, migrations, user directory and feedback log
//! - `school`: Action dispatcher, content catalog and conversation state
//! - `telegram`: teloxide handler tree and response rendering

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod core;
pub mod school;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use school::{ActionDispatcher, InboundEvent, ResponseDescriptor};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
