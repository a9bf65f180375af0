//! HTTP API: routing, bearer-token middleware and the response envelope.

pub mod app;
pub mod context;
pub mod middleware;
