//! Submission parser: loads one contributor YAML file into a
//! [`RawContribution`].
//!
//! A structurally invalid submission (missing or blank required field,
//! undecodable YAML) is a fatal per-file error. The platform already
//! checked the file exists, so a broken document means the submission
//! tooling misfired and must surface loudly rather than be skipped.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use dexsync_shared::{DEFAULT_SUBMITTER, DexsyncError, RawContribution, Result};

/// The raw YAML document shape. Every key is optional here so that
/// required-field checks can produce precise messages instead of a generic
/// decode failure; unknown extra keys are tolerated.
#[derive(Debug, Deserialize)]
struct SubmissionDoc {
    pokemon_name: Option<String>,
    trainer_note: Option<String>,
    submitted_by: Option<String>,
}

/// Parse a submission file from disk.
pub fn parse_submission(path: &Path) -> Result<RawContribution> {
    let text = std::fs::read_to_string(path).map_err(|e| DexsyncError::io(path, e))?;
    let contribution =
        parse_submission_str(&text).map_err(|msg| DexsyncError::submission(path, msg))?;

    debug!(path = %path.display(), pokemon = %contribution.pokemon_name, "parsed submission");
    Ok(contribution)
}

/// Parse submission text. Split out from the file read so the validation
/// rules are testable without touching disk.
fn parse_submission_str(text: &str) -> std::result::Result<RawContribution, String> {
    let doc: SubmissionDoc =
        serde_yaml::from_str(text).map_err(|e| format!("not a valid submission document: {e}"))?;

    let pokemon_name = require_field(doc.pokemon_name, "pokemon_name")?;
    let trainer_note = require_field(doc.trainer_note, "trainer_note")?;

    let submitted_by = doc
        .submitted_by
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SUBMITTER.to_string());

    Ok(RawContribution {
        pokemon_name,
        trainer_note,
        submitted_by,
    })
}

/// A required field must be present and non-empty after trimming.
fn require_field(value: Option<String>, key: &str) -> std::result::Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(format!("required field '{key}' is empty")),
        None => Err(format!("required field '{key}' is missing")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_submission() {
        let text = "pokemon_name: Pikachu\ntrainer_note: Caught at Viridian Forest\nsubmitted_by: ash\n";
        let c = parse_submission_str(text).unwrap();
        assert_eq!(c.pokemon_name, "Pikachu");
        assert_eq!(c.trainer_note, "Caught at Viridian Forest");
        assert_eq!(c.submitted_by, "ash");
    }

    #[test]
    fn missing_submitter_gets_the_sentinel() {
        let text = "pokemon_name: Pikachu\ntrainer_note: hello\n";
        let c = parse_submission_str(text).unwrap();
        assert_eq!(c.submitted_by, DEFAULT_SUBMITTER);
    }

    #[test]
    fn blank_submitter_gets_the_sentinel() {
        let text = "pokemon_name: Pikachu\ntrainer_note: hello\nsubmitted_by: '  '\n";
        let c = parse_submission_str(text).unwrap();
        assert_eq!(c.submitted_by, DEFAULT_SUBMITTER);
    }

    #[test]
    fn missing_name_is_an_error_naming_the_field() {
        let err = parse_submission_str("trainer_note: hello\n").unwrap_err();
        assert!(err.contains("pokemon_name"));
        assert!(err.contains("missing"));
    }

    #[test]
    fn whitespace_only_note_is_an_error() {
        let err = parse_submission_str("pokemon_name: Pikachu\ntrainer_note: '   '\n").unwrap_err();
        assert!(err.contains("trainer_note"));
        assert!(err.contains("empty"));
    }

    #[test]
    fn multiline_notes_survive() {
        let text = "pokemon_name: Snorlax\ntrainer_note: |\n  Blocked the road for a week.\n  Woke it with a Poké Flute.\n";
        let c = parse_submission_str(text).unwrap();
        assert!(c.trainer_note.contains("Poké Flute"));
        assert!(c.trainer_note.contains('\n'));
    }

    #[test]
    fn undecodable_yaml_is_an_error() {
        let err = parse_submission_str("pokemon_name: [unterminated\n").unwrap_err();
        assert!(err.contains("not a valid submission document"));
    }

    #[test]
    fn parse_from_fixture_file() {
        let path = Path::new("../../../fixtures/submissions/pikachu.yaml");
        let c = parse_submission(path).expect("fixture parses");
        assert_eq!(c.pokemon_name, "Pikachu");
        assert_eq!(c.submitted_by, DEFAULT_SUBMITTER);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = parse_submission(Path::new("/nonexistent/sub.yaml")).unwrap_err();
        assert!(matches!(err, DexsyncError::Io { .. }));
    }
}
