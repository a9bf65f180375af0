use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfwise_core::{Entity, UnitId};

use crate::record::{CatalogRecord, MAX_NAME_LEN, finish, max_len, require};

pub const MAX_SHORT_NAME_LEN: usize = 50;

/// A unit of measure such as "Kilogram" / "kg".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub short_name: String,
    pub is_active: bool,
    pub no_of_products: i32,
    pub created_at: DateTime<Utc>,
}

impl Entity for Unit {
    type Id = UnitId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDraft {
    pub id: Option<UnitId>,
    pub name: String,
    pub short_name: String,
    pub is_active: bool,
    pub no_of_products: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for UnitDraft {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            short_name: String::new(),
            is_active: true,
            no_of_products: 0,
            created_at: None,
        }
    }
}

impl CatalogRecord for Unit {
    type Draft = UnitDraft;

    const KIND: &'static str = "unit";

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(draft: &UnitDraft) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if require(&mut errors, &draft.name, "Name") {
            max_len(&mut errors, &draft.name, "Name", MAX_NAME_LEN);
        }
        if require(&mut errors, &draft.short_name, "Short name") {
            max_len(&mut errors, &draft.short_name, "Short name", MAX_SHORT_NAME_LEN);
        }
        if draft.no_of_products < 0 {
            errors.push("NoOfProducts must be zero or a positive number.".to_string());
        }
        finish(errors)
    }

    fn from_draft(draft: UnitDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: draft.id.filter(|id| !id.is_nil()).unwrap_or_default(),
            name: draft.name,
            short_name: draft.short_name,
            is_active: draft.is_active,
            no_of_products: draft.no_of_products,
            created_at: draft.created_at.unwrap_or(now),
        }
    }

    fn apply(draft: UnitDraft, existing: &mut Self) {
        existing.name = draft.name;
        existing.short_name = draft.short_name;
        existing.is_active = draft.is_active;
        existing.no_of_products = draft.no_of_products;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failure() {
        let bad = UnitDraft {
            short_name: "x".repeat(MAX_SHORT_NAME_LEN + 1),
            no_of_products: -1,
            ..UnitDraft::default()
        };
        assert_eq!(
            Unit::validate(&bad),
            Err(vec![
                "Name is required.".to_string(),
                "Short name must be at most 50 characters long.".to_string(),
                "NoOfProducts must be zero or a positive number.".to_string(),
            ])
        );
    }

    #[test]
    fn short_name_is_required() {
        let draft = UnitDraft {
            name: "Kilogram".into(),
            ..UnitDraft::default()
        };
        assert_eq!(Unit::validate(&draft), Err(vec!["Short name is required.".to_string()]));
    }
}
