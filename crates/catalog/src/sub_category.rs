use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfwise_core::{CategoryId, Entity, SubCategoryId};

use crate::record::{CatalogRecord, MAX_NAME_LEN, finish, max_len, require};

/// A grouping inside a category. The parent id is stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub name: String,
    pub slug: String,
    pub category_id: CategoryId,
    pub description: String,
    pub code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for SubCategory {
    type Id = SubCategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategoryDraft {
    pub id: Option<SubCategoryId>,
    pub name: String,
    pub slug: String,
    pub category_id: CategoryId,
    pub description: String,
    pub code: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for SubCategoryDraft {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            slug: String::new(),
            category_id: CategoryId::default(),
            description: String::new(),
            code: String::new(),
            is_active: true,
            created_at: None,
        }
    }
}

impl CatalogRecord for SubCategory {
    type Draft = SubCategoryDraft;

    const KIND: &'static str = "sub-category";

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(draft: &SubCategoryDraft) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if require(&mut errors, &draft.name, "Name") {
            max_len(&mut errors, &draft.name, "Name", MAX_NAME_LEN);
        }
        max_len(&mut errors, &draft.slug, "Slug", MAX_NAME_LEN);
        finish(errors)
    }

    fn from_draft(draft: SubCategoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: draft.id.filter(|id| !id.is_nil()).unwrap_or_default(),
            name: draft.name,
            slug: draft.slug,
            category_id: draft.category_id,
            description: draft.description,
            code: draft.code,
            is_active: draft.is_active,
            created_at: draft.created_at.unwrap_or(now),
        }
    }

    fn apply(draft: SubCategoryDraft, existing: &mut Self) {
        existing.name = draft.name;
        existing.slug = draft.slug;
        existing.category_id = draft.category_id;
        existing.description = draft.description;
        existing.code = draft.code;
        existing.is_active = draft.is_active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_moves_to_another_category_but_keeps_identity() {
        let now = Utc::now();
        let mut sub = SubCategory::from_draft(
            SubCategoryDraft {
                name: "Juices".into(),
                ..SubCategoryDraft::default()
            },
            now,
        );
        let id = sub.id;
        let target = CategoryId::new();

        SubCategory::apply(
            SubCategoryDraft {
                id: Some(SubCategoryId::new()),
                name: "Fresh juices".into(),
                category_id: target,
                created_at: Some(now - chrono::Duration::days(3)),
                ..SubCategoryDraft::default()
            },
            &mut sub,
        );

        assert_eq!((sub.id, sub.created_at), (id, now));
        assert_eq!((sub.name.as_str(), sub.category_id), ("Fresh juices", target));
    }
}
