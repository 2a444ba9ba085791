//! Document-level extraction: detect the vendor, then run its parser.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::{LineItemRecord, Vendor};

use super::{detect_vendor, parser_for, Result};

/// Result of extracting one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Vendor detected from the document text.
    pub vendor: Vendor,
    /// Line items, in document order.
    pub records: Vec<LineItemRecord>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Routes document text to the parser of its vendor.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    /// Return an empty result for unknown vendors instead of failing.
    skip_unknown_vendors: bool,
}

impl DocumentExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self {
            skip_unknown_vendors: true,
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_skip_unknown_vendors(config.skip_unknown_vendors)
    }

    /// Set whether unknown vendors yield an empty result or an error.
    pub fn with_skip_unknown_vendors(mut self, skip: bool) -> Self {
        self.skip_unknown_vendors = skip;
        self
    }

    /// Extract the line items of one document.
    pub fn extract(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        info!("Extracting line items from {} characters of text", text.len());

        let vendor = detect_vendor(text);
        let records = match parser_for(vendor) {
            Some(parser) => parser.parse(text)?,
            None if self.skip_unknown_vendors => {
                warn!("No known vendor marker found, document yields no line items");
                Vec::new()
            }
            None => return Err(ExtractionError::UnsupportedVendor),
        };

        info!("Extracted {} line items ({})", records.len(), vendor);

        Ok(ExtractionResult {
            vendor,
            records,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the line items of one document with default settings.
pub fn extract_records(text: &str) -> Result<Vec<LineItemRecord>> {
    DocumentExtractor::new().extract(text).map(|r| r.records)
}
