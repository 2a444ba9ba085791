//! Aggregation of line items across the documents of one import.

use serde::Serialize;
use tracing::{debug, warn};

use crate::models::record::{LineItemRecord, Vendor};

use super::DocumentExtractor;

/// Outcome status of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Success,
    Failed,
}

/// What happened to one input document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    /// Input name (usually a file name).
    pub source: String,
    pub status: DocumentStatus,
    /// Detected vendor, when extraction got that far.
    pub vendor: Option<Vendor>,
    /// Number of records contributed to the batch.
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub processing_time_ms: u64,
}

/// Records of several documents, accumulated in input order.
///
/// A document that fails contributes no records and never affects records
/// already accumulated.
#[derive(Debug, Default)]
pub struct RecordBatch {
    extractor: DocumentExtractor,
    records: Vec<LineItemRecord>,
    outcomes: Vec<DocumentOutcome>,
}

impl RecordBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific extractor for every document.
    pub fn with_extractor(extractor: DocumentExtractor) -> Self {
        Self {
            extractor,
            ..Self::default()
        }
    }

    /// Extract one document's text and append its records.
    pub fn add_text(&mut self, source: impl Into<String>, text: &str) -> &DocumentOutcome {
        let source = source.into();

        let outcome = match self.extractor.extract(text) {
            Ok(result) => {
                debug!("{}: {} records from {}", source, result.records.len(), result.vendor);
                let outcome = DocumentOutcome {
                    source,
                    status: DocumentStatus::Success,
                    vendor: Some(result.vendor),
                    records: result.records.len(),
                    error: None,
                    processing_time_ms: result.processing_time_ms,
                };
                self.records.extend(result.records);
                outcome
            }
            Err(e) => {
                warn!("Failed to extract {}: {}", source, e);
                DocumentOutcome {
                    source,
                    status: DocumentStatus::Failed,
                    vendor: None,
                    records: 0,
                    error: Some(e.to_string()),
                    processing_time_ms: 0,
                }
            }
        };

        self.push_outcome(outcome)
    }

    /// Record a document that failed before extraction (e.g. unreadable PDF).
    pub fn add_failure(
        &mut self,
        source: impl Into<String>,
        error: impl std::fmt::Display,
    ) -> &DocumentOutcome {
        let source = source.into();
        warn!("Failed to read {}: {}", source, error);

        self.push_outcome(DocumentOutcome {
            source,
            status: DocumentStatus::Failed,
            vendor: None,
            records: 0,
            error: Some(error.to_string()),
            processing_time_ms: 0,
        })
    }

    fn push_outcome(&mut self, outcome: DocumentOutcome) -> &DocumentOutcome {
        self.outcomes.push(outcome);
        &self.outcomes[self.outcomes.len() - 1]
    }

    pub fn records(&self) -> &[LineItemRecord] {
        &self.records
    }

    pub fn outcomes(&self) -> &[DocumentOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == DocumentStatus::Success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == DocumentStatus::Failed)
    }

    pub fn into_records(self) -> Vec<LineItemRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VROOMLY_DOC: &str = "Vroomly\nPneus\n175/65R14 82T\n2 32,20 20% 64,40\n";
    const SOPARTEX_DOC: &str = "Sopartex\n12345 3 Filtre à huile 15,50 46,50\n";
    const BROKEN_DOC: &str = "Sopartex\n1 99999999999 Vis 1,00 1,00\n";

    #[test]
    fn test_records_keep_input_order() {
        let mut batch = RecordBatch::new();
        batch.add_text("a.pdf", SOPARTEX_DOC);
        batch.add_text("b.pdf", VROOMLY_DOC);
        batch.add_text("c.pdf", SOPARTEX_DOC);

        let references: Vec<&str> = batch.records().iter().map(|r| r.reference()).collect();
        assert_eq!(references, vec!["12345", "175/65R14 82T", "12345"]);
        assert_eq!(batch.succeeded().count(), 3);
    }

    #[test]
    fn test_failed_document_keeps_previous_records() {
        let mut batch = RecordBatch::new();
        batch.add_text("good.pdf", VROOMLY_DOC);

        let outcome = batch.add_text("broken.pdf", BROKEN_DOC);
        assert_eq!(outcome.status, DocumentStatus::Failed);
        assert!(outcome.error.as_deref().unwrap().contains("quantity"));

        batch.add_text("later.pdf", SOPARTEX_DOC);

        assert_eq!(batch.records().len(), 2);
        assert_eq!(batch.failed().count(), 1);
        assert_eq!(batch.outcomes()[2].vendor, Some(Vendor::Sopartex));
    }

    #[test]
    fn test_unknown_vendor_is_a_successful_empty_document() {
        let mut batch = RecordBatch::new();
        let outcome = batch.add_text("other.pdf", "Facture Oscaro");

        assert_eq!(outcome.status, DocumentStatus::Success);
        assert_eq!(outcome.vendor, Some(Vendor::Unknown));
        assert_eq!(outcome.records, 0);
    }

    #[test]
    fn test_add_failure() {
        let mut batch = RecordBatch::new();
        batch.add_failure("scan.pdf", "PDF is encrypted");

        assert_eq!(batch.failed().count(), 1);
        assert!(batch.into_records().is_empty());
    }
}
