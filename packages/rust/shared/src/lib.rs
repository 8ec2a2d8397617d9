//! Shared types, error model, and configuration for dexsync.
//!
//! This crate is the foundation depended on by all other dexsync crates.
//! It provides:
//! - [`DexsyncError`] — the unified error type
//! - Domain types ([`RawContribution`], [`CanonicalEntry`], [`ChangedFile`])
//! - Configuration ([`AppConfig`], [`RunConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CatalogConfig, PipelineConfig, PlatformConfig, RunConfig, config_file_path,
    init_config, load_config, load_config_from, resolve_run,
};
pub use error::{DexsyncError, Result};
pub use types::{CanonicalEntry, ChangeKind, ChangedFile, DEFAULT_SUBMITTER, RawContribution};
