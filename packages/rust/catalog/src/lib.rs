//! Catalog client: resolves a submitted Pokémon name to its authoritative
//! numeric id and a sprite URL via the external catalog's read endpoint.
//!
//! The catalog is the trust boundary of the pipeline: a submission only
//! carries a name, and everything else (id, sprite) comes from here.

pub mod extract;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use dexsync_shared::{DexsyncError, Result};

/// User-Agent string for catalog requests.
const USER_AGENT: &str = concat!("dexsync/", env!("CARGO_PKG_VERSION"));

/// Sprite locator candidates, most preferred first: the animated gen-V
/// front sprite, then the plain default front sprite. The first path that
/// yields a non-empty string wins.
const SPRITE_PATHS: &[&[&str]] = &[
    &[
        "sprites",
        "versions",
        "generation-v",
        "black-white",
        "animated",
        "front_default",
    ],
    &["sprites", "front_default"],
];

// ---------------------------------------------------------------------------
// CatalogHit
// ---------------------------------------------------------------------------

/// Successful catalog resolution for one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogHit {
    /// Catalog-assigned numeric identity.
    pub id: u32,
    /// Resolved sprite URL, or `None` when no candidate path yielded one.
    /// A missing sprite is a catalog data gap, not a contributor error;
    /// the caller decides to skip, not to abort.
    pub sprite: Option<String>,
}

// ---------------------------------------------------------------------------
// CatalogClient
// ---------------------------------------------------------------------------

/// Read-only, unauthenticated client for the external catalog.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client for the given catalog base URL (no trailing slash).
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DexsyncError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a submitted name against the catalog.
    ///
    /// The name is lowercased and trimmed before querying; the catalog's
    /// keys are lowercase. A not-found response is a validation failure
    /// ([`DexsyncError::UnknownPokemon`]) distinct from transport errors.
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> Result<CatalogHit> {
        let query_name = name.trim().to_lowercase();
        let url = format!("{}/pokemon/{query_name}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DexsyncError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DexsyncError::UnknownPokemon {
                name: name.trim().to_string(),
            });
        }
        if !status.is_success() {
            return Err(DexsyncError::Network(format!("{url}: HTTP {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DexsyncError::Network(format!("{url}: invalid JSON body: {e}")))?;

        let id = extract::lookup(&body, &["id"])
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
            .ok_or_else(|| {
                DexsyncError::Network(format!("{url}: catalog response has no numeric id"))
            })?;

        let sprite = SPRITE_PATHS
            .iter()
            .find_map(|path| extract::lookup_str(&body, path))
            .map(String::from);

        match &sprite {
            Some(sprite) => debug!(%query_name, id, %sprite, "catalog hit"),
            None => warn!(%query_name, id, "catalog has no sprite for this Pokémon"),
        }

        Ok(CatalogHit { id, sprite })
    }
}
