//! Core pipeline orchestration and domain logic for keypeople.
//!
//! This crate ties together the graph fetchers, the individual filter,
//! watchlist screening, and the summary projection into the end-to-end
//! screening run.

pub mod filter;
pub mod pipeline;
pub mod summary;
