//! Inbound events delivered by the transport.

use serde::{Deserialize, Serialize};

/// Telegram account that sent the event. Missing profile fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Account {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_names(mut self, username: &str, first_name: &str, last_name: &str) -> Self {
        self.username = username.to_string();
        self.first_name = first_name.to_string();
        self.last_name = last_name.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `/start` or any other request for the welcome screen
    Greeting,
    /// Raw `web_app_data` sent by the Mini App
    ClientPayload(String),
    /// Plain text message
    FreeText(String),
    /// Inline keyboard button press, carries the callback data
    CategorySelection(String),
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Greeting => "greeting",
            EventKind::ClientPayload(_) => "client_payload",
            EventKind::FreeText(_) => "free_text",
            EventKind::CategorySelection(_) => "category_selection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub account: Account,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn greeting(account: Account) -> Self {
        Self {
            account,
            kind: EventKind::Greeting,
        }
    }

    pub fn client_payload(account: Account, payload: impl Into<String>) -> Self {
        Self {
            account,
            kind: EventKind::ClientPayload(payload.into()),
        }
    }

    pub fn free_text(account: Account, text: impl Into<String>) -> Self {
        Self {
            account,
            kind: EventKind::FreeText(text.into()),
        }
    }

    pub fn category_selection(account: Account, data: impl Into<String>) -> Self {
        Self {
            account,
            kind: EventKind::CategorySelection(data.into()),
        }
    }
}
