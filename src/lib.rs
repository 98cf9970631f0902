//! TravelOps back-office service.
//!
//! In-memory record stores for the agency's back-office pages, served as a
//! JSON API over axum, plus an LLM-backed recommendation collaborator. The
//! binary entry point is `src/main.rs`; integration tests drive the router
//! through this library.

pub mod capacity;
pub mod config;
pub mod error;
pub mod llm;
pub mod logger;
pub mod search;
pub mod subsystems;
