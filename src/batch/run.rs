// src/batch/run.rs
// =============================================================================
// This module runs the composer over one or more root documents.
//
// For each document:
// 1. Read it from disk
// 2. Compose it (fragments are looked up next to the document)
// 3. Write the result back, to another file, or nowhere (dry run)
//
// Several documents are processed concurrently. Composing is plain
// synchronous file work, so each document runs on tokio's blocking thread
// pool and we keep up to `concurrency` of them in flight.
//
// A failure on one document never stops the others - it just shows up as a
// Failed entry in the report.
//
// Rust concepts:
// - spawn_blocking: run synchronous code without stalling the async runtime
// - Streams: buffered(N) runs N futures at once but keeps input order
// - anyhow::Context: attach "reading <file>" to low-level I/O errors
// =============================================================================

use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::compose::{
    ComposeConfig, Composer, Composition, FsSource, MarkerOutcome, MarkerPattern,
};

// What to do with the composed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Write to `output`, or back over the document itself
    Write { output: Option<PathBuf> },
    /// Compose only; the text is kept in the report
    DryRun,
}

// One root document to compose
#[derive(Debug, Clone)]
pub struct DocumentJob {
    pub path: PathBuf,
    pub mode: Mode,
}

impl DocumentJob {
    pub fn new(path: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }
}

// What happened to one document
//
// #[serde(tag = "status")] turns Checked { changed: true } into
// {"status": "checked", "changed": true}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Composed text was written
    Updated { written_to: PathBuf },
    /// Nothing to change, nothing written
    Unchanged,
    /// Dry run; `changed` tells whether composing would alter the document
    Checked { changed: bool },
    /// The document could not be read or written
    Failed { message: String },
}

// Everything we know about one document after composing it
//
// This is what gets printed as a table or as JSON
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// The root document
    pub path: PathBuf,
    /// Status fields are merged into this object
    #[serde(flatten)]
    pub status: DocumentStatus,
    pub markers: Vec<MarkerOutcome>,
    /// Composed text, only kept for dry runs
    #[serde(skip)]
    pub text: Option<String>,
}

impl DocumentReport {
    /// True if the document couldn't be read or written
    pub fn is_failed(&self) -> bool {
        matches!(self.status, DocumentStatus::Failed { .. })
    }

    /// How many markers pointed at a fragment that wasn't found
    pub fn missing_count(&self) -> usize {
        self.markers.iter().filter(|m| m.is_missing()).count()
    }

    fn failed(path: PathBuf, error: anyhow::Error) -> Self {
        Self {
            path,
            status: DocumentStatus::Failed {
                message: format!("{:#}", error),
            },
            markers: Vec::new(),
            text: None,
        }
    }
}

// Composes every job, at most `concurrency` at a time
//
// Parameters:
//   jobs: the documents to compose and what to do with each result
//   marker_pattern: validated marker pattern (shared by all jobs)
//   concurrency: how many documents are in flight at once (min 1)
//
// Returns: one DocumentReport per job, in the same order as `jobs`.
// Failures are reported, never returned as Err.
pub async fn compose_documents(
    jobs: Vec<DocumentJob>,
    marker_pattern: &MarkerPattern,
    concurrency: usize,
) -> Vec<DocumentReport> {
    let futures = jobs.into_iter().map(|job| {
        let marker_pattern = marker_pattern.clone();
        async move {
            let path = job.path.clone();
            let result =
                tokio::task::spawn_blocking(move || compose_document(&job, &marker_pattern)).await;
            match result {
                Ok(Ok(report)) => report,
                Ok(Err(e)) => DocumentReport::failed(path, e),
                Err(join_error) => {
                    DocumentReport::failed(path, anyhow!("task failed: {}", join_error))
                }
            }
        }
    });

    // buffered (not buffer_unordered) so the output order is predictable
    stream::iter(futures)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

// Composes a single document synchronously
//
// Parameters:
//   job: the document path and what to do with the result
//   marker_pattern: validated marker pattern
//
// Returns:
//   Ok(DocumentReport) - composed (and written, unless it's a dry run)
//   Err - the document has no file name, or reading/writing it failed
pub fn compose_document(
    job: &DocumentJob,
    marker_pattern: &MarkerPattern,
) -> Result<DocumentReport> {
    let host_file_name = job
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("{} has no usable file name", job.path.display()))?;

    // Fragments live next to the document: ./<dir>/<host file name>
    let root = match job.path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let host_text = read_file(&job.path)?;

    let config = ComposeConfig::new(host_file_name, marker_pattern.clone());
    let Composition { text, markers } =
        Composer::new(&config, FsSource::new(root)).compose(&host_text);
    let changed = text != host_text;

    log::info!(
        "{}: {} marker(s), {} missing",
        job.path.display(),
        markers.len(),
        markers.iter().filter(|m| m.is_missing()).count()
    );

    let (status, text) = match &job.mode {
        Mode::DryRun => (DocumentStatus::Checked { changed }, Some(text)),
        Mode::Write { output: None } if !changed => (DocumentStatus::Unchanged, None),
        Mode::Write { output } => {
            let target = output.as_deref().unwrap_or(job.path.as_path());
            write_file(target, &text)?;
            (
                DocumentStatus::Updated {
                    written_to: target.to_path_buf(),
                },
                None,
            )
        }
    };

    Ok(DocumentReport {
        path: job.path.clone(),
        status,
        markers,
        text,
    })
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("writing to {}", path.display()))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why spawn_blocking?
//    - std::fs calls block the thread they run on
//    - Inside async code that would stall other tasks on the same thread
//    - spawn_blocking moves the work to a pool meant for exactly this
//
// 2. What is Result<Result<T, E>, JoinError>?
//    - The outer Result: did the blocking task itself finish (or panic)?
//    - The inner Result: did composing the document succeed?
//
// 3. Why clone the marker pattern?
//    - Each task needs to own what it uses ('static requirement)
//    - regex::Regex is cheap to clone (shared internally)
// -----------------------------------------------------------------------------
