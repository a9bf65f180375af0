//! Identifiers and storage primitives shared by every crate.
//!
//! This crate carries no IO; storage adapters live in `shelfwise-infra`.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{StoreError, StoreResult};
pub use id::{
    CategoryId, OtpId, ProductId, ProductLevelId, PurchaseId, RefreshTokenId, SubCategoryId, UnitId, UserId,
};
