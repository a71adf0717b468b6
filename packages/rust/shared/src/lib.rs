//! Shared types, error model, and configuration for keypeople.
//!
//! This crate is the foundation depended on by all other keypeople crates.
//! It provides:
//! - [`KeyPeopleError`] — the unified error type
//! - Domain types ([`Company`], [`BeneficialOwner`], [`MatchedOwner`], [`OwnerSummaryRow`])
//! - Configuration ([`AppConfig`], [`Credentials`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, Credentials, FilterConfig, GraphConfig, ReportConfig, WatchlistConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from,
    resolve_credentials,
};
pub use error::{KeyPeopleError, Result};
pub use types::{
    BeneficialOwner, Company, MatchCandidate, MatchedOwner, OwnerSummaryRow, UNKNOWN,
};
