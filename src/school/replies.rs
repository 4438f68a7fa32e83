//! Fixed replies shown to users.

use strum::IntoEnumIterator;

use crate::school::action::category_callback;
use crate::school::response::{ActionButton, ResponseDescriptor};
use crate::storage::FeedbackCategory;

pub const MALFORMED_REQUEST: &str = "Упс! Что-то пошло не так 😅\nПопробуй еще раз!";
pub const UNKNOWN_ACTION: &str = "Неизвестное действие 🤔\nПопробуй выбрать что-то другое!";
pub const INTERNAL_ERROR: &str = "Произошла ошибка при обработке запроса 🔧";
pub const SECTION_NOT_FOUND: &str = "Не могу найти эту информацию 🔍\nПопробуй выбрать другой раздел!";
pub const FEEDBACK_MENU: &str = "💬 *Обратная связь*\n\nВыберите тип обращения:";
pub const FEEDBACK_THANKS: &str = "Спасибо! 🙏 Ваше обращение передано администрации школы.";
pub const FEEDBACK_EMPTY: &str = "Сообщение пустое 🤔\nНапишите, пожалуйста, текст обращения.";
pub const FEEDBACK_EXPIRED: &str =
    "Эта форма обратной связи уже неактуальна ⌛\nОткрой приложение и выбери «Обратная связь» ещё раз.";
pub const FEEDBACK_NOT_COMMAND: &str =
    "Команды не принимаются как обращение 🤔\nНапишите текст обращения или отправьте /start, чтобы вернуться в меню.";
pub const NO_APP_DATA: &str = "Не удалось получить данные от приложения 😅";
pub const USE_APP_HINT: &str = "Я отвечаю на запросы из школьного приложения 📱\nНажми кнопку ниже или отправь /start.";

const OPEN_APP_BUTTON: &str = "🏫 Открыть школьное приложение";
const DEFAULT_NAME: &str = "друг";

/// Button label for a feedback category.
pub fn category_label(category: FeedbackCategory) -> &'static str {
    match category {
        FeedbackCategory::Suggestion => "💬 Предложение",
        FeedbackCategory::Complaint => "❗ Жалоба",
        FeedbackCategory::Question => "❓ Вопрос",
        FeedbackCategory::Compliment => "👏 Благодарность",
    }
}

/// Escapes user-provided text for Telegram legacy Markdown.
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Drops legacy Markdown markup characters. Backslash escapes are not honoured
/// inside an entity, so text placed within `*...*` can only be stripped.
pub fn strip_markup(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '_' | '*' | '`' | '[')).collect()
}

pub fn welcome(first_name: &str, school_name: &str, webapp_url: &str) -> ResponseDescriptor {
    let name = if first_name.trim().is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        escape_markdown(first_name)
    };

    let text = format!(
        "Привет, {}! 👋\n\n\
         🎓 *Добро пожаловать в {}!*\n\n\
         Рады видеть тебя в нашей школьной семье! Здесь ты можешь:\n\n\
         • 📅 Посмотреть расписание уроков\n\
         • 📝 Узнать домашние задания\n\
         • 📊 Проверить свои оценки\n\
         • 📢 Читать школьные объявления\n\
         • 💬 Связаться с администрацией\n\n\
         Нажми кнопку ниже, чтобы открыть приложение! ⬇️",
        name,
        strip_markup(school_name)
    );

    ResponseDescriptor::markdown(text).with_action(ActionButton::web_app(OPEN_APP_BUTTON, webapp_url))
}

pub fn malformed_request() -> ResponseDescriptor {
    ResponseDescriptor::plain(MALFORMED_REQUEST)
}

pub fn unknown_action() -> ResponseDescriptor {
    ResponseDescriptor::plain(UNKNOWN_ACTION)
}

pub fn internal_error() -> ResponseDescriptor {
    ResponseDescriptor::plain(INTERNAL_ERROR)
}

pub fn section_not_found() -> ResponseDescriptor {
    ResponseDescriptor::plain(SECTION_NOT_FOUND)
}

pub fn feedback_menu() -> ResponseDescriptor {
    ResponseDescriptor::markdown(FEEDBACK_MENU).with_actions(
        FeedbackCategory::iter().map(|category| ActionButton::callback(category_label(category), category_callback(category))),
    )
}

pub fn feedback_prompt(category: FeedbackCategory) -> ResponseDescriptor {
    ResponseDescriptor::markdown(format!(
        "{}\n\n✍️ Напишите ваше сообщение одним текстом, и мы передадим его администрации.",
        category_label(category)
    ))
}

pub fn feedback_thanks() -> ResponseDescriptor {
    ResponseDescriptor::plain(FEEDBACK_THANKS)
}

pub fn feedback_empty() -> ResponseDescriptor {
    ResponseDescriptor::plain(FEEDBACK_EMPTY)
}

pub fn feedback_not_command() -> ResponseDescriptor {
    ResponseDescriptor::plain(FEEDBACK_NOT_COMMAND)
}

pub fn no_app_data() -> ResponseDescriptor {
    ResponseDescriptor::plain(NO_APP_DATA)
}

pub fn feedback_expired() -> ResponseDescriptor {
    ResponseDescriptor::plain(FEEDBACK_EXPIRED)
}

pub fn use_app_hint(webapp_url: &str) -> ResponseDescriptor {
    ResponseDescriptor::plain(USE_APP_HINT).with_action(ActionButton::web_app(OPEN_APP_BUTTON, webapp_url))
}
