use std::path::{Path, PathBuf};

use bilan_core::Table;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ExtractionConfig;
use crate::normalize::normalize;
use crate::rows::{RowBuilder, RowError};
use crate::source::{self, SourceError, TokenSource};
use crate::types::ClassifiedPage;
use crate::year::locate_years;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Token source failed: {0}")]
    Source(#[from] SourceError),
    #[error("Row reconstruction failed: {0}")]
    Rows(#[from] RowError),
    #[error("No document in a batch of {attempted} produced a table")]
    EmptyBatch { attempted: usize },
}

/// Orchestrates: normalize → locate years → build rows.
#[derive(Debug, Clone, Default)]
pub struct DocumentPipeline {
    rows: RowBuilder,
}

impl DocumentPipeline {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { rows: RowBuilder::new(config) }
    }

    /// Reconstructs the table of an already classified page. `document` is
    /// only used for logging; batches add the source column.
    pub fn process_page(&self, document: &str, page: &ClassifiedPage) -> Result<Table, PipelineError> {
        let tokens = normalize(&page.tokens);
        let anchors = locate_years(&tokens.years);
        let rows = self.rows.build(&tokens, &anchors)?;

        let mut table = Table::new(anchors.years());
        table.rows = rows;

        info!(
            document,
            rows = table.rows.len(),
            years = table.years.len(),
            "table reconstructed"
        );
        Ok(table)
    }

    /// Loads `document` from `source` and reconstructs its table.
    pub fn process<S: TokenSource + ?Sized>(&self, source: &S, document: &str) -> Result<Table, PipelineError> {
        let page = source.load(document)?;
        self.process_page(document, &page)
    }

    /// Reads a classifier JSON file and reconstructs its table. The file name
    /// is the document id.
    pub async fn process_file(&self, path: &Path) -> Result<Table, PipelineError> {
        let bytes = tokio::fs::read(path).await.map_err(SourceError::Io)?;
        let page = source::parse_page(&bytes)?;
        self.process_page(&document_id(path), &page)
    }
}

fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Batch driver ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFailure {
    pub document: String,
    pub message: String,
}

/// Merged output of a batch, plus the documents that were skipped.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub table: Table,
    pub processed: usize,
    pub failures: Vec<DocumentFailure>,
}

impl BatchReport {
    fn record(&mut self, document: &str, result: Result<Table, PipelineError>) {
        match result {
            Ok(table) => {
                self.table.append(table.with_source(document));
                self.processed += 1;
            }
            Err(e) => {
                warn!(document, error = %e, "document skipped");
                self.failures.push(DocumentFailure {
                    document: document.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    fn finish(self) -> Result<Self, PipelineError> {
        if self.processed == 0 {
            return Err(PipelineError::EmptyBatch { attempted: self.failures.len() });
        }
        Ok(self)
    }
}

/// Runs the pipeline over several documents strictly in the given order and
/// appends their tables. A failing document is logged and left out; it never
/// aborts the batch.
#[derive(Debug, Clone, Default)]
pub struct BatchDriver {
    pipeline: DocumentPipeline,
}

impl BatchDriver {
    pub fn new(pipeline: DocumentPipeline) -> Self {
        Self { pipeline }
    }

    pub fn run<S, D>(&self, source: &S, documents: &[D]) -> Result<BatchReport, PipelineError>
    where
        S: TokenSource + ?Sized,
        D: AsRef<str>,
    {
        let mut report = BatchReport::default();
        for document in documents {
            let document = document.as_ref();
            report.record(document, self.pipeline.process(source, document));
        }
        report.finish()
    }

    pub async fn run_files(&self, paths: &[PathBuf]) -> Result<BatchReport, PipelineError> {
        let mut report = BatchReport::default();
        for path in paths {
            let result = self.pipeline.process_file(path).await;
            report.record(&document_id(path), result);
        }
        report.finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
