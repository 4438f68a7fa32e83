//! Handler types, dependencies, and account extraction helpers

use std::sync::Arc;

use teloxide::types::{Message, User};

use crate::school::{Account, ActionDispatcher};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub dispatcher: Arc<ActionDispatcher>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(dispatcher: Arc<ActionDispatcher>) -> Self {
        Self { dispatcher }
    }
}

/// Converts a Telegram user into the account the dispatcher works with.
pub fn account_from_user(user: &User) -> Account {
    Account {
        id: i64::try_from(user.id.0).unwrap_or_default(),
        username: user.username.clone().unwrap_or_default(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone().unwrap_or_default(),
    }
}

/// Account of the message sender, falling back to the chat id for messages
/// without a sender (channel posts).
pub fn account_from_message(msg: &Message) -> Account {
    msg.from
        .as_ref()
        .map(account_from_user)
        .unwrap_or_else(|| Account::new(msg.chat.id.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: Option<&str>, last_name: Option<&str>) -> User {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "is_bot": false,
            "first_name": "Маша",
            "last_name": last_name,
            "username": username,
            "language_code": "ru"
        }))
        .unwrap()
    }

    #[test]
    fn test_account_from_full_user() {
        let account = account_from_user(&user(Some("masha"), Some("Иванова")));
        assert_eq!(account, Account::new(42).with_names("masha", "Маша", "Иванова"));
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let account = account_from_user(&user(None, None));
        assert_eq!(account.username, "");
        assert_eq!(account.last_name, "");
        assert_eq!(account.first_name, "Маша");
    }
}
