//! Axum route modules.

pub mod documents;
pub mod health;
pub mod search;
