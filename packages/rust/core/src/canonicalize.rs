//! Canonicalizer: turns a parsed contribution into a catalog-backed
//! [`CanonicalEntry`], or decides to skip it.
//!
//! Owns the fatal-vs-skip policy for validation outcomes. An unknown name
//! is fatal and propagated: a misspelled submission must block the whole
//! merge so the author gets feedback instead of silence. A missing sprite
//! skips this file only: the Pokémon is real but the catalog has nothing
//! to render, which is not the contributor's fault.

use chrono::Utc;
use tracing::{debug, warn};

use dexsync_catalog::CatalogClient;
use dexsync_shared::{CanonicalEntry, RawContribution, Result};

/// Resolve one contribution against the catalog.
///
/// `Ok(None)` means "valid but not renderable": the run continues without
/// this file. Every `Err` is fatal to the run.
pub async fn canonicalize(
    catalog: &CatalogClient,
    raw: &RawContribution,
) -> Result<Option<CanonicalEntry>> {
    let hit = catalog.resolve(&raw.pokemon_name).await?;

    let Some(sprite) = hit.sprite else {
        warn!(
            pokemon = %raw.pokemon_name,
            id = hit.id,
            "no sprite available, omitting this entry"
        );
        return Ok(None);
    };

    let entry = CanonicalEntry {
        id: hit.id,
        name: raw.pokemon_name.clone(),
        note: raw.trainer_note.trim().to_string(),
        sprite,
        submitted_by: raw.submitted_by.clone(),
        timestamp: Utc::now(),
    };

    debug!(name = %entry.name, id = entry.id, "canonicalized entry");
    Ok(Some(entry))
}
