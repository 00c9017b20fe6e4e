//! Shared types for the Mercan label pipeline
//!
//! Data models used by the label engine and the embedding application:
//! paper sizes, label templates and their items, and the read-only
//! product record consumed by variable substitution.

pub mod models;

// Re-exports
pub use models::*;
pub use serde::{Deserialize, Serialize};
