//! Vendor detection and line-item extraction.

mod batch;
mod detector;
mod parser;
pub mod rules;
pub mod sopartex;
pub mod vroomly;

pub use batch::{DocumentOutcome, DocumentStatus, RecordBatch};
pub use detector::detect_vendor;
pub use parser::{extract_records, DocumentExtractor, ExtractionResult};
pub use sopartex::SopartexParser;
pub use vroomly::VroomlyParser;

use crate::error::ExtractionError;
use crate::models::record::{LineItemRecord, Vendor};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for vendor-specific line-item parsers.
pub trait LineItemParser {
    /// The vendor layout this parser understands.
    fn vendor(&self) -> Vendor;

    /// Parse all line items of one document, in document order.
    fn parse(&self, text: &str) -> Result<Vec<LineItemRecord>>;
}

/// Select the parser for a vendor, if one exists.
pub fn parser_for(vendor: Vendor) -> Option<Box<dyn LineItemParser>> {
    match vendor {
        Vendor::Vroomly => Some(Box::new(VroomlyParser::new())),
        Vendor::Sopartex => Some(Box::new(SopartexParser::new())),
        Vendor::Unknown => None,
    }
}

/// Non-empty trimmed lines of a document.
pub(crate) fn content_lines(text: &str) -> Vec<&str> {
    text.split(['\n', '\r', '\x0c'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
