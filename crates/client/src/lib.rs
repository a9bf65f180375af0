//! Typed HTTP client for the Shelfwise API.
//!
//! Keeps the session tokens and, on a `401`, performs one guarded token
//! refresh and retries the request once.

pub mod client;
pub mod envelope;
pub mod guard;

pub use client::{ApiClient, ClientError, LoginData, Session, TokenData};
pub use envelope::ApiEnvelope;
pub use guard::RefreshGuard;
