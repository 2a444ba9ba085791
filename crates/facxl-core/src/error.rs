//! Error types for the facxl-core library.

use thiserror::Error;

/// Main error type for the facxl library.
#[derive(Error, Debug)]
pub enum FacxlError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Line-item extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Spreadsheet export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to line-item extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A matched numeric field could not be converted.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },

    /// A record field violates its invariant.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The document was produced by a vendor with no parser.
    #[error("unsupported vendor layout")]
    UnsupportedVendor,
}

impl ExtractionError {
    pub(crate) fn parse(field: &str, value: &str) -> Self {
        Self::Parse {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors related to writing the catalogue workbook.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Failed to package the workbook archive.
    #[error("failed to build workbook archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The worksheet name is not accepted by spreadsheet applications.
    #[error("invalid sheet name {name:?}: {reason}")]
    InvalidSheetName { name: String, reason: String },

    /// Failed to serialize a workbook part.
    #[error("failed to write XML part: {0}")]
    Xml(String),

    /// Failed to write the workbook to its destination.
    #[error("failed to write workbook: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the facxl library.
pub type Result<T> = std::result::Result<T, FacxlError>;
