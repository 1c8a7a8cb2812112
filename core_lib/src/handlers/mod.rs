//! HTTP handlers

pub mod contact;
pub mod health;
pub mod quote;
pub mod routes;
