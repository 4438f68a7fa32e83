//! Transport-independent reply produced by the dispatcher.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Formatting {
    #[default]
    Plain,
    /// Telegram legacy Markdown (`*bold*`, `_italic_`)
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum ButtonAction {
    /// Inline button answered with a callback query carrying this data
    Callback(String),
    /// Button opening the Mini App at this URL
    WebApp(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    pub label: String,
    pub action: ButtonAction,
}

impl ActionButton {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn web_app(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::WebApp(url.into()),
        }
    }
}

/// Text plus optional buttons, rendered by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseDescriptor {
    pub text: String,
    pub formatting: Formatting,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionButton>,
}

impl ResponseDescriptor {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            formatting: Formatting::Plain,
            actions: Vec::new(),
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            formatting: Formatting::Markdown,
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, button: ActionButton) -> Self {
        self.actions.push(button);
        self
    }

    pub fn with_actions(mut self, buttons: impl IntoIterator<Item = ActionButton>) -> Self {
        self.actions.extend(buttons);
        self
    }
}
