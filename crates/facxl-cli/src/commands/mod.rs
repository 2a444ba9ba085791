//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use facxl_core::models::config::FacxlConfig;

/// Load the configuration from `path`, the default location, or built-in defaults.
pub(crate) fn load_config(path: Option<&str>) -> anyhow::Result<FacxlConfig> {
    if let Some(path) = path {
        return Ok(FacxlConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        tracing::debug!("Using config from {}", default_path.display());
        Ok(FacxlConfig::from_file(&default_path)?)
    } else {
        Ok(FacxlConfig::default())
    }
}

/// Timestamp used in generated workbook names.
pub(crate) fn export_stamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
