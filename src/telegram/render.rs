//! Rendering of response descriptors as Telegram messages

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, WebAppInfo};
use teloxide::RequestError;
use url::Url;

use crate::school::{ActionButton, ButtonAction, Formatting, ResponseDescriptor};

const BUTTONS_PER_ROW: usize = 2;

/// Telegram parse mode for a descriptor's formatting.
///
/// Section content is authored in legacy Markdown (`*bold*`), which has no
/// escaping rules for `.`, `-` or `!`.
#[allow(deprecated)]
pub fn parse_mode(formatting: Formatting) -> Option<ParseMode> {
    match formatting {
        Formatting::Plain => None,
        Formatting::Markdown => Some(ParseMode::Markdown),
    }
}

fn inline_button(button: &ActionButton) -> Option<InlineKeyboardButton> {
    match &button.action {
        ButtonAction::Callback(data) => Some(InlineKeyboardButton::callback(button.label.clone(), data.clone())),
        ButtonAction::WebApp(url) => match Url::parse(url) {
            Ok(url) => Some(InlineKeyboardButton::web_app(button.label.clone(), WebAppInfo { url })),
            Err(e) => {
                log::error!("Invalid Mini App URL '{}': {}, dropping button", url, e);
                None
            }
        },
    }
}

/// Inline keyboard for the descriptor's buttons, two per row.
pub fn keyboard(response: &ResponseDescriptor) -> Option<InlineKeyboardMarkup> {
    let buttons: Vec<InlineKeyboardButton> = response.actions.iter().filter_map(inline_button).collect();
    if buttons.is_empty() {
        return None;
    }

    let rows: Vec<Vec<InlineKeyboardButton>> = buttons.chunks(BUTTONS_PER_ROW).map(<[_]>::to_vec).collect();
    Some(InlineKeyboardMarkup::new(rows))
}

pub(crate) fn is_markdown_parse_error(err: &RequestError) -> bool {
    err.to_string().to_lowercase().contains("can't parse entities")
}

/// Sends a descriptor to a chat.
///
/// A Markdown reply Telegram refuses to parse is sent again as plain text so
/// the user still gets an answer.
pub async fn send_response(bot: &Bot, chat_id: ChatId, response: &ResponseDescriptor) -> ResponseResult<Message> {
    let markup = keyboard(response);

    let mut request = bot.send_message(chat_id, response.text.clone());
    if let Some(mode) = parse_mode(response.formatting) {
        request = request.parse_mode(mode);
    }
    if let Some(markup) = markup.clone() {
        request = request.reply_markup(markup);
    }

    match request.await {
        Ok(msg) => Ok(msg),
        Err(e) if response.formatting == Formatting::Markdown && is_markdown_parse_error(&e) => {
            log::warn!("Markdown rejected for chat {}: {}, resending as plain text", chat_id, e);
            let mut retry = bot.send_message(chat_id, response.text.clone());
            if let Some(markup) = markup {
                retry = retry.reply_markup(markup);
            }
            retry.await
        }
        Err(e) => Err(e),
    }
}
