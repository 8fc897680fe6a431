use time::Date;

use super::repo_types::TodoFields;
use crate::error::FieldErrors;

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_CATEGORY_LEN: usize = 100;

/// Checks a todo about to be written. `previous_due` is the stored due date
/// on updates; an unchanged past date is let through.
pub fn validate_todo(
    fields: &TodoFields,
    previous_due: Option<Option<Date>>,
    today: Date,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if fields.title.trim().is_empty() {
        errors.add("title", "This field may not be blank.");
    } else if fields.title.chars().count() > MAX_TITLE_LEN {
        errors.add(
            "title",
            format!("Ensure this field has no more than {MAX_TITLE_LEN} characters."),
        );
    }
    if fields.category.chars().count() > MAX_CATEGORY_LEN {
        errors.add(
            "category",
            format!("Ensure this field has no more than {MAX_CATEGORY_LEN} characters."),
        );
    }
    if let Some(due) = fields.due_date {
        let changed = previous_due != Some(Some(due));
        if changed && due < today {
            errors.add("due_date", "Due date cannot be in the past.");
        }
    }
    errors
}
