//! Error types for dexsync.
//!
//! Library crates use [`DexsyncError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics; its process
//! exit status is the merge gate for the invoking automation.

use std::path::PathBuf;

/// Top-level error type for all dexsync operations.
///
/// Every variant is fatal to the run that raises it. The two non-fatal
/// conditions in the pipeline (a Pokémon without any usable sprite, and a
/// missing or unreadable dataset on first run) are not errors and never
/// appear here.
#[derive(Debug, thiserror::Error)]
pub enum DexsyncError {
    /// Configuration loading or validation error (missing credential,
    /// missing repository or PR number). Raised before any network call.
    #[error("config error: {message}")]
    Config { message: String },

    /// The hosting platform's pull-request file listing failed.
    #[error("platform API error: {message}")]
    Platform { message: String },

    /// Transport or server failure talking to the catalog.
    #[error("network error: {0}")]
    Network(String),

    /// The catalog has no Pokémon by this name. The one contributor-facing
    /// failure: the wording must point at the submission, not at internals.
    #[error("no Pokémon named '{name}' exists in the catalog — check the spelling in your submission and resubmit")]
    UnknownPokemon { name: String },

    /// A submission file is structurally invalid (required field missing or
    /// empty after trimming, or the YAML itself does not decode).
    #[error("invalid submission {path:?}: {message}")]
    Submission { path: PathBuf, message: String },

    /// Dataset serialization error.
    #[error("store error: {0}")]
    Store(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DexsyncError>;

impl DexsyncError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a platform-API error from any displayable message.
    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }

    /// Create a submission error for a given file.
    pub fn submission(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Submission {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DexsyncError::config("GITHUB_TOKEN is not set");
        assert_eq!(err.to_string(), "config error: GITHUB_TOKEN is not set");

        let err = DexsyncError::platform("listing PR files: HTTP 403");
        assert!(err.to_string().contains("HTTP 403"));
    }

    #[test]
    fn unknown_pokemon_names_the_subject() {
        let err = DexsyncError::UnknownPokemon {
            name: "Pikachuu".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Pikachuu"));
        assert!(msg.contains("check the spelling"));
    }
}
