//! Batch command - export the line items of many invoices to one workbook.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use facxl_core::models::config::{FacxlConfig, PdfConfig};
use facxl_core::{
    CatalogueExporter, DocumentExtractor, DocumentOutcome, DocumentStatus, PdfExtractor,
    PdfProcessor, RecordBatch,
};

use super::{export_stamp, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output workbook (default: <output-dir>/<prefix>_<timestamp>.xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the generated workbook and summary
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut batch = RecordBatch::with_extractor(DocumentExtractor::from_config(&config.extraction));

    for path in &files {
        let source = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        match document_text(path, &config.pdf).await {
            Ok(text) => {
                batch.add_text(source, &text);
            }
            Err(e) => {
                batch.add_failure(source, e);
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let destination = export_destination(&args, &config);
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let succeeded = batch.succeeded().count();
    let failed: Vec<DocumentOutcome> = batch.failed().cloned().collect();
    let outcomes = batch.outcomes().to_vec();
    let records = batch.into_records();
    let record_count = records.len();

    let exporter = CatalogueExporter::from_config(&config.export)?;
    let target = destination.clone();
    tokio::task::spawn_blocking(move || exporter.export(&records, &target)).await??;

    println!(
        "{} Wrote {} line items to {}",
        style("✓").green(),
        record_count,
        destination.display()
    );

    if args.summary {
        let summary_path = destination
            .parent()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(succeeded).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            println!(
                "  - {}: {}",
                outcome.source,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Text of one input file; PDFs go through text extraction.
async fn document_text(path: &Path, pdf_config: &PdfConfig) -> anyhow::Result<String> {
    let data = tokio::fs::read(path).await?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => {
            let mut extractor = PdfExtractor::from_config(pdf_config);
            let text = tokio::task::spawn_blocking(move || {
                extractor.load(&data)?;
                extractor.extract_text()
            })
            .await??;
            debug!("Extracted {} characters from {}", text.len(), path.display());
            Ok(text)
        }
        "txt" => Ok(String::from_utf8(data)?),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

fn export_destination(args: &BatchArgs, config: &FacxlConfig) -> PathBuf {
    if let Some(output) = &args.output {
        return output.clone();
    }

    let mut config = config.clone();
    if let Some(output_dir) = &args.output_dir {
        config.export.output_dir = output_dir.clone();
    }
    config.export_path(&export_stamp())
}

fn write_summary(path: &Path, outcomes: &[DocumentOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "vendor",
        "records",
        "processing_time_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let status = match outcome.status {
            DocumentStatus::Success => "success",
            DocumentStatus::Failed => "error",
        };

        wtr.write_record([
            outcome.source.as_str(),
            status,
            outcome.vendor.map(|v| v.as_str()).unwrap_or(""),
            &outcome.records.to_string(),
            &outcome.processing_time_ms.to_string(),
            outcome.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_every_outcome() {
        let mut batch = RecordBatch::new();
        batch.add_text("a.txt", "SOPARTEX\n12345 3 Filtre à huile 15,50 46,50\n");
        batch.add_failure("b.pdf", "failed to parse PDF: broken");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        write_summary(&path, batch.outcomes()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "filename,status,vendor,records,processing_time_ms,error");
        assert!(lines[1].starts_with("a.txt,success,sopartex,1,"));
        assert!(lines[2].starts_with("b.pdf,error,,0,0,"));
        assert!(lines[2].contains("broken"));
    }

    #[tokio::test]
    async fn test_batch_exports_good_files_and_reports_bad_ones() {
        use calamine::{open_workbook, Data, Reader, Xlsx};

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a_vroomly.txt"),
            "VROOMLY\nDescription Qté PU HT Remise Total\nPneus\nLING LONG Grnmaxxas\n175/65R14 82T\n2 32,20 20% 64,40\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b_sopartex.txt"),
            "SOPARTEX\n12345 3 Filtre à huile 15,50 46,50\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("c_broken.pdf"), b"not a pdf").unwrap();

        let output = dir.path().join("out").join("catalogue.xlsx");
        let args = BatchArgs {
            input: dir.path().join("*").to_string_lossy().into_owned(),
            output: Some(output.clone()),
            output_dir: None,
            summary: true,
        };

        run(args, None).await.unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&output).unwrap();
        let range = workbook.worksheet_range("Catalogue").unwrap();
        assert_eq!(range.height(), 2);
        assert_eq!(range.get((0, 0)), Some(&Data::String("175/65R14 82T".to_string())));
        assert_eq!(range.get((1, 0)), Some(&Data::String("12345".to_string())));

        let summary = std::fs::read_to_string(dir.path().join("out").join("summary.csv")).unwrap();
        assert_eq!(summary.lines().count(), 4);
        assert!(summary.contains("c_broken.pdf,error"));
    }

    #[test]
    fn test_explicit_output_wins() {
        let args = BatchArgs {
            input: "*.pdf".to_string(),
            output: Some(PathBuf::from("out/catalogue.xlsx")),
            output_dir: Some(PathBuf::from("elsewhere")),
            summary: false,
        };

        let destination = export_destination(&args, &FacxlConfig::default());
        assert_eq!(destination, PathBuf::from("out/catalogue.xlsx"));
    }

    #[test]
    fn test_output_dir_overrides_config() {
        let args = BatchArgs {
            input: "*.pdf".to_string(),
            output: None,
            output_dir: Some(PathBuf::from("exports")),
            summary: false,
        };

        let destination = export_destination(&args, &FacxlConfig::default());
        let name = destination.file_name().and_then(|n| n.to_str()).unwrap();

        assert_eq!(destination.parent(), Some(Path::new("exports")));
        assert!(name.starts_with("export_"));
        assert!(name.ends_with(".xlsx"));
    }
}
