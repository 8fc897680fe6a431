use time::Date;

use super::repo_types::EntryFields;
use crate::error::FieldErrors;

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_TAGS: usize = 10;

/// Number of whitespace-delimited tokens.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Checks an entry as it is about to be written.
pub fn validate_entry(fields: &EntryFields, today: Date) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if fields.title.trim().is_empty() {
        errors.add("title", "This field may not be blank.");
    } else if fields.title.chars().count() > MAX_TITLE_LEN {
        errors.add(
            "title",
            format!("Ensure this field has no more than {MAX_TITLE_LEN} characters."),
        );
    }
    if fields.content.trim().is_empty() {
        errors.add("content", "This field may not be blank.");
    }
    if fields.tags.len() > MAX_TAGS {
        errors.add("tags", format!("Maximum {MAX_TAGS} tags allowed."));
    }
    if fields.date > today {
        errors.add("date", "Journal date cannot be in the future.");
    }
    errors
}
