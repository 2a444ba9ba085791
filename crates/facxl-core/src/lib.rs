//! Core library for supplier invoice import.
//!
//! This crate provides:
//! - PDF text extraction
//! - Vendor detection (Vroomly / Docauto, Sopartex)
//! - Vendor-specific line-item parsing
//! - Catalogue export to a fixed-layout XLSX sheet

pub mod error;
pub mod export;
pub mod invoice;
pub mod models;
pub mod pdf;

pub use error::{ExportError, ExtractionError, FacxlError, PdfError, Result};
pub use export::{catalogue_row, CatalogueExporter, Cell};
pub use invoice::{
    detect_vendor, extract_records, parser_for, DocumentExtractor, DocumentOutcome,
    DocumentStatus, ExtractionResult, LineItemParser, RecordBatch, SopartexParser, VroomlyParser,
};
pub use models::config::FacxlConfig;
pub use models::record::{LineItemRecord, Vendor, UNKNOWN_REFERENCE};
pub use pdf::{PdfExtractor, PdfProcessor};

/// Extract the text of a PDF and parse its line items.
pub fn process_pdf(data: &[u8], config: &FacxlConfig) -> Result<ExtractionResult> {
    let mut extractor = PdfExtractor::from_config(&config.pdf);
    extractor.load(data)?;
    let text = extractor.extract_text()?;

    let result = DocumentExtractor::from_config(&config.extraction).extract(&text)?;
    Ok(result)
}
