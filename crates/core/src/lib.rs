//! Shared domain types for the peer study session planner.
//!
//! Holds the types that cross crate boundaries: ID/timestamp aliases, the
//! domain error enum, the AI planning content model with its fail-closed
//! validator, and best-effort document text extraction.

pub mod error;
pub mod extract;
pub mod planning;
pub mod types;
