//! End-to-end update pipeline:
//! PR number → change set → parse → canonicalize → merge → persist.
//!
//! The pipeline is all-or-nothing for one run: any fatal outcome discards
//! everything accumulated so far and the dataset on disk stays untouched.
//! Catalog lookups run concurrently under a bounded pool, but the merge
//! only starts after every lookup has joined.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use dexsync_catalog::CatalogClient;
use dexsync_changeset::ChangeSetClient;
use dexsync_shared::{CanonicalEntry, DexsyncError, Result, RunConfig};
use dexsync_store::PokedexStore;
use dexsync_submission::parse_submission;

use crate::canonicalize::canonicalize;

/// Result of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct UpdateResult {
    /// Submission files in the resolved change set.
    pub files_seen: usize,
    /// Entries actually appended to the dataset.
    pub entries_added: usize,
    /// Entries rejected because their id already existed.
    pub duplicates: usize,
    /// Files omitted because the catalog had no sprite.
    pub skipped_no_sprite: usize,
    /// Dataset size after the run.
    pub total_entries: usize,
    /// Whether the dataset file was rewritten.
    pub changed: bool,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a submission file has been validated.
    fn file_processed(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &UpdateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_processed(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &UpdateResult) {}
}

/// Run the full update pipeline for one pull request.
///
/// 1. Resolve the change set (empty ⇒ no-op, exit clean)
/// 2. Parse every submission file
/// 3. Canonicalize against the catalog (bounded concurrency, join first)
/// 4. Merge into the store and persist atomically
#[instrument(skip_all, fields(pr = run.pr_number, repository = %run.repository))]
pub async fn run_update(run: &RunConfig, progress: &dyn ProgressReporter) -> Result<UpdateResult> {
    let start = Instant::now();

    info!(pr = run.pr_number, repository = %run.repository, "starting update pipeline");

    // --- Phase 1: resolve change set ---
    progress.phase("Resolving change set");
    let changeset = ChangeSetClient::new(&run.platform_base, &run.token)?;
    let files = changeset
        .list_changed_submissions(
            &run.repository,
            run.pr_number,
            &run.submissions_dir,
            &run.submission_ext,
        )
        .await?;

    if files.is_empty() {
        info!("no submission files in this pull request, nothing to do");
        let result = UpdateResult {
            elapsed: start.elapsed(),
            ..UpdateResult::default()
        };
        progress.done(&result);
        return Ok(result);
    }

    // --- Phase 2: parse submissions ---
    // Sequential and fail-fast: a malformed file halts the run before any
    // catalog traffic is spent on the batch.
    progress.phase("Parsing submissions");
    let mut contributions = Vec::with_capacity(files.len());
    for file in &files {
        let absolute = run.checkout_root.join(file);
        contributions.push(parse_submission(&absolute)?);
    }

    // --- Phase 3: canonicalize against the catalog ---
    progress.phase("Validating against the catalog");
    let catalog = Arc::new(CatalogClient::new(
        &run.catalog_base,
        run.catalog_timeout_secs,
    )?);
    let semaphore = Arc::new(Semaphore::new(run.concurrency as usize));

    let mut handles = Vec::with_capacity(contributions.len());
    for (index, raw) in contributions.into_iter().enumerate() {
        let catalog = catalog.clone();
        let sem = semaphore.clone();

        handles.push(tokio::spawn(async move {
            let _permit = sem.acquire().await.expect("semaphore closed");
            (index, canonicalize(&catalog, &raw).await)
        }));
    }

    // Join everything before acting on any outcome, then re-establish the
    // change-set order. A fatal outcome from any lookup aborts after the
    // joins and before the store is touched.
    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        let joined = handle
            .await
            .map_err(|e| DexsyncError::Network(format!("catalog lookup task failed: {e}")))?;
        outcomes.push(joined);
    }
    outcomes.sort_by_key(|(index, _)| *index);

    let mut entries: Vec<CanonicalEntry> = Vec::new();
    let mut skipped_no_sprite = 0usize;
    let total = files.len();

    for ((file, (_, outcome)), current) in files.iter().zip(outcomes).zip(1..) {
        match outcome? {
            Some(entry) => entries.push(entry),
            None => {
                warn!(file = %file, "skipped: catalog has no sprite for this submission");
                skipped_no_sprite += 1;
            }
        }
        progress.file_processed(file, current, total);
    }

    // --- Phase 4: merge and persist ---
    progress.phase("Merging dataset");
    let mut store = PokedexStore::load(&run.dataset_path);
    let outcome = store.merge(entries);
    let changed = store.persist()?;

    let result = UpdateResult {
        files_seen: files.len(),
        entries_added: outcome.added,
        duplicates: outcome.duplicates,
        skipped_no_sprite,
        total_entries: store.len(),
        changed,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        files_seen = result.files_seen,
        entries_added = result.entries_added,
        duplicates = result.duplicates,
        skipped = result.skipped_no_sprite,
        total_entries = result.total_entries,
        elapsed_ms = result.elapsed.as_millis(),
        "update pipeline complete"
    );

    Ok(result)
}
