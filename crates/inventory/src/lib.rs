//! Stock Ledger: per-product purchased and in-stock quantities.
//!
//! Business rules live in [`level`] as pure functions; [`ledger`] drives them
//! through the storage seam in [`repository`].

pub mod ledger;
pub mod level;
pub mod repository;

pub use ledger::{LedgerError, StockLedger};
pub use level::{LevelCommand, ProductLevel, StockPolicy, apply};
pub use repository::{LevelMutation, ProductLevelRepository};
