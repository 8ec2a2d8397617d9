//! Application configuration for dexsync.
//!
//! Optional config lives at `dexsync.toml` in the checkout root (the tool
//! runs inside a CI working copy, so there is no per-user config dir).
//! CLI flags override environment variables, which override config file
//! values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DexsyncError, Result};

/// Default configuration file name, looked up in the checkout root.
const CONFIG_FILE_NAME: &str = "dexsync.toml";

// ---------------------------------------------------------------------------
// Config structs (matching dexsync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pipeline paths and limits.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Catalog (PokeAPI) settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Hosting platform (GitHub) settings.
    #[serde(default)]
    pub platform: PlatformConfig,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory (repo-relative) that holds contributor submissions.
    #[serde(default = "default_submissions_dir")]
    pub submissions_dir: String,

    /// File extension recognized as a submission.
    #[serde(default = "default_submission_ext")]
    pub submission_ext: String,

    /// Repo-relative path of the canonical dataset document.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,

    /// Maximum concurrent catalog lookups.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            submissions_dir: default_submissions_dir(),
            submission_ext: default_submission_ext(),
            dataset_path: default_dataset_path(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_submissions_dir() -> String {
    "submissions/".into()
}
fn default_submission_ext() -> String {
    ".yaml".into()
}
fn default_dataset_path() -> String {
    "public/data/pokedex_data.json".into()
}
fn default_concurrency() -> u32 {
    4
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog's read endpoint.
    #[serde(default = "default_catalog_base")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

fn default_catalog_base() -> String {
    "https://pokeapi.co/api/v2".into()
}
fn default_catalog_timeout() -> u64 {
    10
}

/// `[platform]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the hosting platform API.
    #[serde(default = "default_platform_base")]
    pub api_base: String,

    /// Name of the env var holding the bearer credential (never the
    /// credential itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Name of the env var holding the `owner/repo` identifier.
    #[serde(default = "default_repo_env")]
    pub repository_env: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_base: default_platform_base(),
            token_env: default_token_env(),
            repository_env: default_repo_env(),
        }
    }
}

fn default_platform_base() -> String {
    "https://api.github.com".into()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_repo_env() -> String {
    "GITHUB_REPOSITORY".into()
}

// ---------------------------------------------------------------------------
// Run config (runtime, merged from config + env + CLI flags)
// ---------------------------------------------------------------------------

/// Everything one pipeline run needs, fully resolved.
///
/// Built by [`resolve_run`] before any network call; a hole here is a
/// configuration error, not a mid-run surprise.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Pull request number identifying the run.
    pub pr_number: u64,
    /// `owner/repo` identifier on the hosting platform.
    pub repository: String,
    /// Bearer credential for the file-listing call.
    pub token: String,
    /// Root of the checked-out repository; changed paths are joined here.
    pub checkout_root: PathBuf,
    /// Directory prefix recognized as submissions.
    pub submissions_dir: String,
    /// Extension recognized as a submission.
    pub submission_ext: String,
    /// Absolute path of the canonical dataset document.
    pub dataset_path: PathBuf,
    /// Maximum concurrent catalog lookups.
    pub concurrency: u32,
    /// Catalog base URL.
    pub catalog_base: String,
    /// Catalog request timeout in seconds.
    pub catalog_timeout_secs: u64,
    /// Platform API base URL.
    pub platform_base: String,
}

/// Resolve a full [`RunConfig`] from the loaded config, the environment,
/// and CLI inputs. Fails fast on a missing credential or repository.
pub fn resolve_run(
    config: &AppConfig,
    pr_number: u64,
    repository: Option<&str>,
    checkout_root: &Path,
) -> Result<RunConfig> {
    let token = std::env::var(&config.platform.token_env)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            DexsyncError::config(format!(
                "platform credential not found. Set the {} environment variable.",
                config.platform.token_env
            ))
        })?;

    let repository = match repository {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => std::env::var(&config.platform.repository_env)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                DexsyncError::config(format!(
                    "repository not given. Pass --repo or set the {} environment variable.",
                    config.platform.repository_env
                ))
            })?,
    };

    Ok(RunConfig {
        pr_number,
        repository,
        token,
        checkout_root: checkout_root.to_path_buf(),
        submissions_dir: config.pipeline.submissions_dir.clone(),
        submission_ext: config.pipeline.submission_ext.clone(),
        dataset_path: checkout_root.join(&config.pipeline.dataset_path),
        concurrency: config.pipeline.concurrency.max(1),
        catalog_base: config.catalog.base_url.clone(),
        catalog_timeout_secs: config.catalog.timeout_secs,
        platform_base: config.platform.api_base.clone(),
    })
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file under a checkout root.
pub fn config_file_path(checkout_root: &Path) -> PathBuf {
    checkout_root.join(CONFIG_FILE_NAME)
}

/// Load the application config from the checkout root. Returns defaults if
/// the file does not exist.
pub fn load_config(checkout_root: &Path) -> Result<AppConfig> {
    let path = config_file_path(checkout_root);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DexsyncError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DexsyncError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file into the checkout root.
/// Returns the path to the created file.
pub fn init_config(checkout_root: &Path) -> Result<PathBuf> {
    let path = config_file_path(checkout_root);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DexsyncError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DexsyncError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
