//! Static section content served to the Mini App.
//!
//! The catalog is loaded once at start-up and is read-only afterwards. A
//! data-backed provider (live timetable, gradebook) can replace it behind the
//! same [`ContentCatalog`] trait.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::core::error::{AppError, AppResult};

/// Section of informational content.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Schedule,
    Homework,
    Grades,
    Announcements,
}

/// Read-only lookup of section bodies.
pub trait ContentCatalog: Send + Sync {
    fn get(&self, section: SectionId) -> Option<&str>;
}

const SCHEDULE: &str = "📅 *Держи актуальное расписание на сегодня!*\n\n\
*10А класс:*\n\
1. 8:00-8:45 - Математика (каб. 201) 👨‍🏫\n\
2. 8:55-9:40 - Русский язык (каб. 105) 👩‍🏫\n\
3. 9:50-10:35 - История (каб. 301) 👨‍🏫\n\
4. 10:55-11:40 - Физика (каб. 205) 👩‍🏫\n\
5. 11:50-12:35 - Английский (каб. 102) 👩‍🏫\n\n\
Удачного дня! 🌟";

const HOMEWORK: &str = "📝 *У тебя есть новые домашние задания!*\n\n\
*Математика* (до 09.12):\n\
• Стр. 127, №№ 15-20\n\
• Подготовься к контрольной! 📊\n\n\
*Русский язык* (до 08.12):\n\
• Сочинение 200-250 слов ✍️\n\n\
*История* (до 10.12):\n\
• Параграф 12, вопросы 1-7 📚\n\n\
Не забудь выполнить все задания! 💪";

const GRADES: &str = "📊 *Твои последние оценки:*\n\n\
*Математика:* 4, 5, 4 (средний: 4.3) 📈\n\
*Русский язык:* 5, 4, 5 (средний: 4.7) 🌟\n\
*История:* 4, 4, 3 (средний: 3.7) 📖\n\
*Физика:* 5, 5, 4 (средний: 4.7) ⚡\n\n\
*Общий средний балл: 4.4* 🎯\n\n\
Отличная работа! Так держать! 👏";

const ANNOUNCEMENTS: &str = "📢 *Школьные новости и объявления:*\n\n\
🔴 *ВАЖНО!* Изменения в расписании\n\
8 декабря физика переносится на 6 урок\n\n\
🎉 *День открытых дверей*\n\
15 декабря в 15:00 - приглашаем всех!\n\n\
👨‍👩‍👧‍👦 *Родительское собрание*\n\
20 декабря в 18:00\n\n\
Следи за обновлениями! 📱";

/// In-memory catalog keyed by section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCatalog {
    sections: HashMap<SectionId, String>,
}

impl StaticCatalog {
    /// Catalog with the content shipped in the binary.
    pub fn builtin() -> Self {
        let sections = SectionId::iter()
            .map(|section| {
                let body = match section {
                    SectionId::Schedule => SCHEDULE,
                    SectionId::Homework => HOMEWORK,
                    SectionId::Grades => GRADES,
                    SectionId::Announcements => ANNOUNCEMENTS,
                };
                (section, body.to_string())
            })
            .collect();
        Self { sections }
    }

    /// Parses a `{"schedule": "...", ...}` JSON object. Unknown section keys are rejected.
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let sections: HashMap<SectionId, String> =
            serde_json::from_str(json).map_err(|e| AppError::Catalog(e.to_string()))?;
        Ok(Self { sections })
    }

    /// Loads a catalog file and lays it over the built-in content.
    ///
    /// Sections present in the file replace the built-in ones, the rest keep
    /// the shipped text.
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let overrides = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} catalog section(s) from {}",
            overrides.sections.len(),
            path.display()
        );

        let mut catalog = Self::builtin();
        catalog.sections.extend(overrides.sections);
        Ok(catalog)
    }

    /// Sections with content, in declaration order.
    pub fn sections(&self) -> Vec<SectionId> {
        let mut sections: Vec<SectionId> = self.sections.keys().copied().collect();
        sections.sort();
        sections
    }
}

impl ContentCatalog for StaticCatalog {
    fn get(&self, section: SectionId) -> Option<&str> {
        self.sections.get(&section).map(String::as_str)
    }
}
