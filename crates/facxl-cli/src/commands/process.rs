//! Process command - extract line items from a single invoice file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use facxl_core::models::config::FacxlConfig;
use facxl_core::{CatalogueExporter, DocumentExtractor, ExtractionResult};

use super::{export_stamp, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or plain text already extracted from one)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout, or a timestamped workbook for xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
    /// Catalogue workbook
    Xlsx,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading input...");
    pb.set_position(10);
    let data = tokio::fs::read(&args.input).await?;

    pb.set_message("Extracting line items...");
    pb.set_position(40);
    let result = extract_document(&args.input, data, config.clone()).await?;

    pb.finish_and_clear();

    match args.format {
        OutputFormat::Xlsx => {
            let destination = args
                .output
                .clone()
                .unwrap_or_else(|| config.export_path(&export_stamp()));
            if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }

            let exporter = CatalogueExporter::from_config(&config.export)?;
            let records = result.records;
            let target = destination.clone();
            tokio::task::spawn_blocking(move || exporter.export(&records, &target)).await??;

            println!(
                "{} Workbook written to {}",
                style("✓").green(),
                destination.display()
            );
        }
        format => {
            let output = format_result(&result, format)?;
            if let Some(output_path) = &args.output {
                tokio::fs::write(output_path, &output).await?;
                println!(
                    "{} Output written to {}",
                    style("✓").green(),
                    output_path.display()
                );
            } else {
                println!("{}", output);
            }
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Extract the line items of one input file, whatever its kind.
pub(crate) async fn extract_document(
    path: &Path,
    data: Vec<u8>,
    config: FacxlConfig,
) -> anyhow::Result<ExtractionResult> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let result = match extension.as_str() {
        "pdf" => {
            tokio::task::spawn_blocking(move || facxl_core::process_pdf(&data, &config)).await??
        }
        "txt" => {
            let text = String::from_utf8(data)?;
            let extractor = DocumentExtractor::from_config(&config.extraction);
            tokio::task::spawn_blocking(move || extractor.extract(&text)).await??
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    Ok(result)
}

fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
        OutputFormat::Xlsx => anyhow::bail!("xlsx output is written as a workbook, not text"),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["reference", "designation", "quantity", "unit_purchase_price"])?;

    for record in &result.records {
        wtr.write_record([
            record.reference(),
            record.designation(),
            &record.quantity().to_string(),
            &record.unit_purchase_price().to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Vendor: {}\n", result.vendor));
    output.push_str(&format!("Line items: {}\n", result.records.len()));

    if !result.records.is_empty() {
        output.push('\n');
    }

    for record in &result.records {
        output.push_str(&format!(
            "  {} | {} | {} x {}\n",
            record.reference(),
            record.designation(),
            record.quantity(),
            record.unit_purchase_price()
        ));
    }

    output
}
