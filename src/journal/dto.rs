use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::{EntryFields, JournalEntry, Mood};
use super::services::word_count;
use crate::error::FieldErrors;

/// POST body.
#[derive(Debug, Deserialize)]
pub struct JournalEntryInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub date: Option<Date>,
}

impl JournalEntryInput {
    /// `date` falls back to `default_date` when omitted.
    pub fn into_fields(self, default_date: Date) -> EntryFields {
        EntryFields {
            title: self.title,
            content: self.content,
            mood: self.mood,
            tags: self.tags,
            date: self.date.unwrap_or(default_date),
        }
    }
}

/// PUT and PATCH body. PUT additionally requires the fields a create requires;
/// anything omitted keeps its stored value.
#[derive(Debug, Default, Deserialize)]
pub struct JournalEntryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<Mood>,
    pub tags: Option<Vec<String>>,
    pub date: Option<Date>,
}

impl JournalEntryPatch {
    pub fn missing_required(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.is_none() {
            errors.add("title", "This field is required.");
        }
        if self.content.is_none() {
            errors.add("content", "This field is required.");
        }
        errors
    }

    pub fn apply(self, mut fields: EntryFields) -> EntryFields {
        if let Some(title) = self.title {
            fields.title = title;
        }
        if let Some(content) = self.content {
            fields.content = content;
        }
        if let Some(mood) = self.mood {
            fields.mood = mood;
        }
        if let Some(tags) = self.tags {
            fields.tags = tags;
        }
        if let Some(date) = self.date {
            fields.date = date;
        }
        fields
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JournalListQuery {
    pub mood: Option<Mood>,
    pub date: Option<Date>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl JournalListQuery {
    /// No filter, search or ordering: the only shape served from cache.
    pub fn is_plain(&self) -> bool {
        self.mood.is_none() && self.date.is_none() && self.search.is_none() && self.ordering.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub tags: Vec<String>,
    pub date: Date,
    pub word_count: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<JournalEntry> for JournalEntryResponse {
    fn from(e: JournalEntry) -> Self {
        Self {
            id: e.id,
            word_count: word_count(&e.content),
            title: e.title,
            content: e.content,
            mood: e.mood,
            tags: e.tags,
            date: e.date,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
