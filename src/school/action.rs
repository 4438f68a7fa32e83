//! Typed decoding of Mini App payloads and callback data.

use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, AppResult};
use crate::storage::FeedbackCategory;

/// Role assumed when the payload doesn't say.
pub const DEFAULT_ROLE: &str = "student";

/// Prefix of the feedback category callback data, e.g. `feedback_question`.
pub const FEEDBACK_CALLBACK_PREFIX: &str = "feedback_";

/// Payload sent by the Mini App through `Telegram.WebApp.sendData`.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActionRequest {
    pub action: Option<String>,
    pub section: Option<String>,
    /// Advisory only, never used for access control
    pub role: Option<String>,
}

impl ActionRequest {
    /// Decodes a raw payload. Anything that isn't a JSON object with string
    /// (or null) fields is rejected.
    pub fn decode(raw: &str) -> AppResult<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(AppError::MalformedPayload(<serde_json::Error as serde::de::Error>::custom(
                "payload is not a JSON object",
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or(DEFAULT_ROLE)
    }

    pub fn classify(&self) -> Action {
        match self.action.as_deref() {
            Some("open_section") => Action::OpenSection,
            Some("feedback") => Action::Feedback,
            Some("main_menu") => Action::MainMenu,
            other => Action::Unrecognized(other.map(str::to_string)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenSection,
    Feedback,
    MainMenu,
    /// Unknown or missing `action`
    Unrecognized(Option<String>),
}

/// Callback data for a feedback category button.
pub fn category_callback(category: FeedbackCategory) -> String {
    format!("{}{}", FEEDBACK_CALLBACK_PREFIX, category)
}

/// Parses `feedback_<category>` callback data.
pub fn parse_category_callback(data: &str) -> Option<FeedbackCategory> {
    data.strip_prefix(FEEDBACK_CALLBACK_PREFIX)?.parse().ok()
}
