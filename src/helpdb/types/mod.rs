//! Foundational data structures, error types, and the decoded document model.

pub mod database;
pub mod error;
pub mod models;
pub mod system;
pub mod topic;
pub mod uri;
