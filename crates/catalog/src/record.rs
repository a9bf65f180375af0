use chrono::{DateTime, Utc};

use shelfwise_core::Entity;

/// Upper bound for names and slugs.
pub const MAX_NAME_LEN: usize = 200;

/// A catalog row and the caller-supplied draft it is built from.
pub trait CatalogRecord: Entity<Id: Send + Sync> + Clone + Send + Sync + 'static {
    type Draft: Send + 'static;

    /// Singular name used in logs.
    const KIND: &'static str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Field-level validation; returns every failure at once.
    fn validate(draft: &Self::Draft) -> Result<(), Vec<String>>;

    /// Build a new record, filling id and timestamp when absent.
    fn from_draft(draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Overwrite the editable fields; id and `created_at` are kept.
    fn apply(draft: Self::Draft, existing: &mut Self);
}

pub(crate) fn require(errors: &mut Vec<String>, value: &str, label: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(format!("{label} is required."));
        false
    } else {
        true
    }
}

pub(crate) fn max_len(errors: &mut Vec<String>, value: &str, label: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(format!("{label} must be at most {max} characters long."));
    }
}

pub(crate) fn finish(errors: Vec<String>) -> Result<(), Vec<String>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_collect_messages() {
        let mut errors = Vec::new();
        assert!(!require(&mut errors, "  ", "Name"));
        max_len(&mut errors, "abcd", "Slug", 3);
        max_len(&mut errors, "abc", "Slug", 3);

        assert_eq!(
            finish(errors),
            Err(vec![
                "Name is required.".to_string(),
                "Slug must be at most 3 characters long.".to_string(),
            ])
        );
        assert_eq!(finish(Vec::new()), Ok(()));
    }
}
