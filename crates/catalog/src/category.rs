use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfwise_core::{CategoryId, Entity};

use crate::record::{CatalogRecord, MAX_NAME_LEN, finish, max_len, require};

/// A top-level product grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    /// URL or data URL; empty when the category has no image.
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    /// Honored on create when present and non-nil.
    pub id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub image_url: String,
    /// Honored on create when present.
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for CategoryDraft {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            slug: String::new(),
            is_active: true,
            image_url: String::new(),
            created_at: None,
        }
    }
}

impl CatalogRecord for Category {
    type Draft = CategoryDraft;

    const KIND: &'static str = "category";

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(draft: &CategoryDraft) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if require(&mut errors, &draft.name, "Name") {
            max_len(&mut errors, &draft.name, "Name", MAX_NAME_LEN);
        }
        max_len(&mut errors, &draft.slug, "Slug", MAX_NAME_LEN);
        finish(errors)
    }

    fn from_draft(draft: CategoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: draft.id.filter(|id| !id.is_nil()).unwrap_or_default(),
            name: draft.name,
            slug: draft.slug,
            is_active: draft.is_active,
            image_url: draft.image_url,
            created_at: draft.created_at.unwrap_or(now),
        }
    }

    fn apply(draft: CategoryDraft, existing: &mut Self) {
        existing.name = draft.name;
        existing.slug = draft.slug;
        existing.is_active = draft.is_active;
        existing.image_url = draft.image_url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CategoryDraft {
        CategoryDraft {
            name: "Beverages".into(),
            slug: "beverages".into(),
            ..CategoryDraft::default()
        }
    }

    #[test]
    fn name_is_required_and_bounded() {
        let blank = CategoryDraft {
            name: " ".into(),
            ..draft()
        };
        assert_eq!(Category::validate(&blank), Err(vec!["Name is required.".to_string()]));

        let long = CategoryDraft {
            name: "x".repeat(MAX_NAME_LEN + 1),
            slug: "y".repeat(MAX_NAME_LEN + 1),
            ..draft()
        };
        assert_eq!(Category::validate(&long).unwrap_err().len(), 2);
        assert!(Category::validate(&draft()).is_ok());
    }

    #[test]
    fn new_categories_are_active_by_default() {
        let category = Category::from_draft(draft(), Utc::now());
        assert!(category.is_active);
        assert!(!category.id.is_nil());
    }

    #[test]
    fn nil_id_is_replaced() {
        let category = Category::from_draft(
            CategoryDraft {
                id: Some(CategoryId::from_uuid(uuid::Uuid::nil())),
                ..draft()
            },
            Utc::now(),
        );
        assert!(!category.id.is_nil());
    }
}
