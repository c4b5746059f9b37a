//! End-to-end scrape ingestion pipeline.
//!
//! Orchestrates the full flow for one ingestion run:
//!   1. Load each configured listing page (windows-1252, missing pages skipped)
//!   2. Extract organization cards into raw field sets
//!   3. Decode obfuscated emails inline, per card
//!   4. Normalise raw fields into canonical records
//!   5. Check each record against the directory store by composite key
//!   6. Score and insert new organizations
//!   7. Emit progress events via broadcast channel
//!
//! Data flows one way; no stage calls back upstream. Running the same
//! pass twice against an unchanged document set and store inserts
//! nothing the second time — every record is then a duplicate by key.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::extract::CardExtractor;
use crate::loader::load_document;
use crate::normalise::canonicalise;
use crate::repository::IngestionRepository;

// ── Job config ────────────────────────────────────────────────────────────────

/// Parameters for a single ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionJob {
    /// Listing pages to process, in order.
    pub documents: Vec<PathBuf>,
}

// ── Progress events ───────────────────────────────────────────────────────────

/// Progress event emitted during a run (cloneable for broadcast).
#[derive(Debug, Clone, Serialize)]
pub struct IngestionProgress {
    pub job_id: Uuid,
    pub stage: String,
    pub document: Option<String>,
    pub parsed: usize,
    pub inserted: usize,
}

// ── Result summary ────────────────────────────────────────────────────────────

/// Summary of one completed ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionSummary {
    pub job_id: Uuid,
    /// Valid records parsed across all documents.
    pub parsed: usize,
    pub inserted: usize,
    pub skipped_duplicate: usize,
    pub malformed: usize,
    pub files_missing: usize,
    pub duration_ms: u64,
}

// ── Pipeline orchestrator ─────────────────────────────────────────────────────

/// Runs the end-to-end scrape ingestion pipeline for one job.
///
/// Progress events are sent via `progress_tx` if provided. Missing
/// documents, malformed cards and duplicate records are skipped and
/// counted; only a store failure aborts the run. Records inserted
/// before an abort stay inserted.
#[instrument(skip(repo, progress_tx))]
pub async fn run_ingestion(
    job: IngestionJob,
    repo: Arc<IngestionRepository>,
    progress_tx: Option<broadcast::Sender<IngestionProgress>>,
) -> anyhow::Result<IngestionSummary> {
    let job_id = Uuid::new_v4();
    let t0 = std::time::Instant::now();
    // One timestamp for the whole run, not per document.
    let scraped_at = Utc::now();

    info!(job_id = %job_id, documents = job.documents.len(), "Starting scrape ingestion");

    let emit = |stage: &str, document: Option<&Path>, summary: &IngestionSummary| {
        if let Some(ref tx) = progress_tx {
            let _ = tx.send(IngestionProgress {
                job_id,
                stage: stage.to_string(),
                document: document.map(|p| p.display().to_string()),
                parsed: summary.parsed,
                inserted: summary.inserted,
            });
        }
    };

    let extractor = CardExtractor::new();

    let mut summary = IngestionSummary {
        job_id,
        parsed: 0,
        inserted: 0,
        skipped_duplicate: 0,
        malformed: 0,
        files_missing: 0,
        duration_ms: 0,
    };

    for path in &job.documents {
        emit("load", Some(path), &summary);
        info!(path = %path.display(), "Processing document");

        let Some(doc) = load_document(path) else {
            summary.files_missing += 1;
            continue;
        };

        let report = extractor.extract(&doc.text);
        summary.malformed += report.malformed;
        info!(
            path = %path.display(),
            cards = report.records.len(),
            malformed = report.malformed,
            "Document extracted"
        );

        for fields in report.records {
            let Some(record) = canonicalise(fields, scraped_at) else {
                summary.malformed += 1;
                continue;
            };
            summary.parsed += 1;

            let outcome = repo.insert_record(&record).await?;
            if outcome.was_new {
                summary.inserted += 1;
            } else {
                summary.skipped_duplicate += 1;
                info!(name = %record.name, "Duplicate record skipped");
            }
        }

        emit("document_done", Some(path), &summary);
    }

    summary.duration_ms = t0.elapsed().as_millis() as u64;

    info!(
        job_id = %job_id,
        parsed = summary.parsed,
        inserted = summary.inserted,
        skipped_duplicate = summary.skipped_duplicate,
        malformed = summary.malformed,
        files_missing = summary.files_missing,
        duration_ms = summary.duration_ms,
        "Scrape ingestion complete"
    );

    emit("complete", None, &summary);

    Ok(summary)
}
