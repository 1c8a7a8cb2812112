//! Middleware components for the HTTP server

pub mod cache;
pub mod cors;
pub mod logging;
pub mod rate_limit;
