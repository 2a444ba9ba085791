//! Configuration structures for the import pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the facxl pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacxlConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Line-item extraction configuration.
    pub extraction: ExtractionConfig,

    /// Catalogue export configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read per document (0 = unlimited).
    pub max_pages: usize,
}

/// Line-item extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Treat documents from unknown vendors as empty rather than failed.
    pub skip_unknown_vendors: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            skip_unknown_vendors: true,
        }
    }
}

/// Catalogue export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Worksheet name.
    pub sheet_name: String,

    /// Directory for generated workbooks when no explicit path is given.
    pub output_dir: PathBuf,

    /// File name prefix for generated workbooks.
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Catalogue".to_string(),
            output_dir: PathBuf::from("output"),
            file_prefix: "export".to_string(),
        }
    }
}

impl FacxlConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Default workbook path for an export stamped with `stamp`.
    pub fn export_path(&self, stamp: &str) -> PathBuf {
        self.export
            .output_dir
            .join(format!("{}_{}.xlsx", self.export.file_prefix, stamp))
    }
}
