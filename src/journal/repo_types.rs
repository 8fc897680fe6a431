use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "journal_mood", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Great,
    Good,
    #[default]
    Neutral,
    Bad,
    Terrible,
}

/// Row of `journal_entries`.
#[derive(Debug, Clone, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub tags: Vec<String>,
    pub date: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Writable columns of an entry, as they will be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub tags: Vec<String>,
    pub date: Date,
}

impl From<&JournalEntry> for EntryFields {
    fn from(e: &JournalEntry) -> Self {
        Self {
            title: e.title.clone(),
            content: e.content.clone(),
            mood: e.mood,
            tags: e.tags.clone(),
            date: e.date,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MoodCount {
    pub mood: Mood,
    pub count: i64,
}
