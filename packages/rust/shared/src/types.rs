//! Core domain types for the dexsync pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Submitter name recorded when a submission carries no `submitted_by` key.
pub const DEFAULT_SUBMITTER: &str = "Anonymous Trainer";

// ---------------------------------------------------------------------------
// RawContribution
// ---------------------------------------------------------------------------

/// A submission file as parsed, before catalog validation.
///
/// Lives only for the processing of one file; the canonicalizer consumes it
/// to produce a [`CanonicalEntry`] (or a skip).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContribution {
    /// Pokémon name exactly as the contributor wrote it (free-form casing).
    pub pokemon_name: String,
    /// Free-text trainer note; may contain embedded line breaks.
    pub trainer_note: String,
    /// Contributor handle, or [`DEFAULT_SUBMITTER`] when absent.
    pub submitted_by: String,
}

// ---------------------------------------------------------------------------
// CanonicalEntry
// ---------------------------------------------------------------------------

/// One validated, catalog-backed record in the published dataset.
///
/// `id` always comes from the catalog lookup for `name`, never from the
/// submission. That is the trust boundary keeping contributors from spoofing
/// another Pokémon's identity or sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntry {
    /// Catalog-assigned numeric identity; the dataset's de facto primary key.
    pub id: u32,
    /// Name as submitted, not normalized.
    pub name: String,
    /// Trainer note, trimmed.
    pub note: String,
    /// Absolute sprite URL. An entry is never persisted without one.
    pub sprite: String,
    /// Contributor credit.
    pub submitted_by: String,
    /// Stamped at canonicalization time.
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Change set
// ---------------------------------------------------------------------------

/// How the pull request touched a file, per the platform API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    /// Anything else (removed, renamed, ...) is never ingested.
    #[serde(other)]
    Other,
}

/// One file touched by the pull request. Transient: produced by the
/// change-set resolver, consumed immediately by the orchestrator.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    /// Repo-relative path.
    pub filename: String,
    /// Change kind reported by the platform.
    pub status: ChangeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_entry_wire_format() {
        let entry = CanonicalEntry {
            id: 25,
            name: "Pikachu".into(),
            note: "Caught at Viridian Forest".into(),
            sprite: "https://sprites.example.com/25.gif".into(),
            submitted_by: DEFAULT_SUBMITTER.into(),
            timestamp: "2025-06-01T12:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["id"], 25);
        assert_eq!(json["submitted_by"], "Anonymous Trainer");
        // timestamp must serialize as an RFC 3339 string for the display layer
        assert!(json["timestamp"].as_str().unwrap().starts_with("2025-06-01T12:00:00"));
    }

    #[test]
    fn canonical_entry_roundtrip() {
        let json = r#"{
            "id": 133,
            "name": "Eevee",
            "note": "Evolved mine into a Vaporeon",
            "sprite": "https://sprites.example.com/133.gif",
            "submitted_by": "misty",
            "timestamp": "2025-06-01T12:00:00Z"
        }"#;

        let entry: CanonicalEntry = serde_json::from_str(json).expect("deserialize");
        assert_eq!(entry.id, 133);
        assert_eq!(entry.submitted_by, "misty");
    }

    #[test]
    fn dataset_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/pokedex.fixture.json")
            .expect("read fixture");
        let entries: Vec<CanonicalEntry> =
            serde_json::from_str(&fixture).expect("deserialize fixture dataset");
        assert_eq!(entries.len(), 3);
        // The published document is kept sorted ascending by id.
        assert!(entries.windows(2).all(|w| w[0].id <= w[1].id));
    }

    #[test]
    fn change_kind_tolerates_unknown_statuses() {
        let file: ChangedFile =
            serde_json::from_str(r#"{"filename": "a.yaml", "status": "renamed"}"#).unwrap();
        assert_eq!(file.status, ChangeKind::Other);

        let file: ChangedFile =
            serde_json::from_str(r#"{"filename": "b.yaml", "status": "added"}"#).unwrap();
        assert_eq!(file.status, ChangeKind::Added);
    }
}
