//! Product catalog: categories, sub-categories, units of measure and products.
//!
//! Records are plain CRUD; the only derived value is the per-category product
//! count reported by [`CatalogService::list_categories`].

pub mod category;
pub mod product;
pub mod record;
pub mod repository;
pub mod service;
pub mod sub_category;
pub mod unit;

pub use category::{Category, CategoryDraft};
pub use product::{Product, ProductDraft};
pub use record::CatalogRecord;
pub use repository::{CatalogRepository, ProductCounts};
pub use service::{CatalogError, CatalogService, CategorySummary, RecordService};
pub use sub_category::{SubCategory, SubCategoryDraft};
pub use unit::{Unit, UnitDraft};
