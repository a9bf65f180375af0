//! Purchase records. Creating and deleting a purchase drives the Stock Ledger
//! on a best-effort basis; see [`service::StockSync`].

pub mod purchase;
pub mod repository;
pub mod service;

pub use purchase::{Purchase, PurchaseDraft};
pub use repository::PurchaseRepository;
pub use service::{PurchaseError, PurchaseService, Recorded, StockSync};
