//! Canonical dataset store: loads the published JSON document, merges
//! validated entries under the duplicate policy, and rewrites it atomically.
//!
//! Duplicate policy: **reject**. An incoming entry whose `id` already exists
//! in the store is skipped; re-running the same change set is a no-op.
//! The display layer keys its widget on `id`, so one entry per Pokémon.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use dexsync_shared::{CanonicalEntry, DexsyncError, Result};

/// What a merge did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// Entries appended to the store.
    pub added: usize,
    /// Entries skipped because their `id` was already present.
    pub duplicates: usize,
}

/// The canonical dataset, held in memory for the duration of one run.
///
/// Loaded once, mutated only through [`merge`](PokedexStore::merge),
/// persisted at most once. Nothing here retries and nothing writes until
/// [`persist`](PokedexStore::persist), so every fatal path upstream leaves
/// the on-disk document exactly as it was.
pub struct PokedexStore {
    path: PathBuf,
    entries: Vec<CanonicalEntry>,
    dirty: bool,
}

impl PokedexStore {
    /// Load the dataset from `path`.
    ///
    /// A missing or unparsable document is the recoverable "first run"
    /// condition: it yields an empty store with a warning, never an error.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<Vec<CanonicalEntry>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "dataset unparsable, starting fresh");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "dataset not found, starting fresh");
                Vec::new()
            }
        };

        debug!(path = %path.display(), entries = entries.len(), "dataset loaded");
        Self {
            path: path.to_path_buf(),
            entries,
            dirty: false,
        }
    }

    /// Entries currently in the store, in document order.
    pub fn entries(&self) -> &[CanonicalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge new entries into the store under the reject-duplicate policy.
    pub fn merge(&mut self, new_entries: Vec<CanonicalEntry>) -> MergeOutcome {
        let mut seen: HashSet<u32> = self.entries.iter().map(|e| e.id).collect();
        let mut outcome = MergeOutcome::default();

        for entry in new_entries {
            if seen.contains(&entry.id) {
                info!(name = %entry.name, id = entry.id, "entry already exists, skipping");
                outcome.duplicates += 1;
                continue;
            }
            seen.insert(entry.id);
            info!(name = %entry.name, id = entry.id, "adding entry");
            self.entries.push(entry);
            outcome.added += 1;
        }

        if outcome.added > 0 {
            self.dirty = true;
        }
        outcome
    }

    /// Write the dataset back to disk if the store grew.
    ///
    /// Sorts ascending by `id` (stable, so entries sharing an id keep their
    /// insertion order), serializes the full document in memory, writes it
    /// to a temp file beside the target, and renames, so a concurrent
    /// reader never observes a partial document. Returns whether a write
    /// happened.
    pub fn persist(&mut self) -> Result<bool> {
        if !self.dirty {
            debug!(path = %self.path.display(), "store unchanged, skipping write");
            return Ok(false);
        }

        self.entries.sort_by_key(|e| e.id);

        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| DexsyncError::Store(format!("serializing dataset: {e}")))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DexsyncError::io(parent, e))?;
        }

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| DexsyncError::Store(format!("dataset path has no file name: {}", self.path.display())))?
            .to_string_lossy();
        let temp = self.path.with_file_name(format!(".{file_name}.tmp"));

        std::fs::write(&temp, &json).map_err(|e| DexsyncError::io(&temp, e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| DexsyncError::io(&self.path, e))?;

        self.dirty = false;
        info!(path = %self.path.display(), total = self.entries.len(), "dataset written");
        Ok(true)
    }
}
