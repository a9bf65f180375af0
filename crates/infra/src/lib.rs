//! Infrastructure layer: configuration, PostgreSQL and in-memory stores, SMTP.

pub mod config;
pub mod db;
pub mod email;
pub mod memory;
pub mod postgres;
pub mod stores;

pub use config::{AppConfig, ConfigError, SmtpConfig};
pub use email::{LoggingEmailSender, SmtpEmailSender, UnconfiguredEmailSender};
pub use stores::Stores;
