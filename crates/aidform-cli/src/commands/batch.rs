//! Batch command - extract fields from many documents in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use aidform_core::{AidformConfig, DocumentType, Question, best_per_question};

use super::extract::{ExtractReport, OutputFormat, extract_file, format_report, parse_doc_type};
use super::sidecar::SIDECAR_SUFFIX;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (PDF and text files)
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Document type for every file (default: inferred per file name)
    #[arg(short = 't', long, value_parser = parse_doc_type)]
    doc_type: Option<DocumentType>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include diagnostics in each report
    #[arg(long)]
    diagnostics: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    report: Option<ExtractReport>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(super::config::load(config_path)?);

    let files = collect_inputs(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let config = Arc::clone(&config);
        let doc_type = args.doc_type;
        let diagnostics = args.diagnostics;

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let result = process_single_file(&path, doc_type, &config, diagnostics);
            (path, result)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let (path, result) = handle.await?;
        match result {
            Ok(report) => results.push(FileResult {
                path,
                report: Some(report),
                error: None,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        report: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<&FileResult> = results.iter().filter(|r| r.report.is_some()).collect();
    let failed: Vec<&FileResult> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(report) = &result.report {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_report(report, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
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
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Expand the pattern to PDF and text inputs, skipping OCR sidecars.
fn collect_inputs(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let sidecar_suffix = format!(".{}", SIDECAR_SUFFIX);
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .filter(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or("");
            !name.to_lowercase().ends_with(&sidecar_suffix)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn process_single_file(
    path: &Path,
    doc_type: Option<DocumentType>,
    config: &AidformConfig,
    diagnostics: bool,
) -> anyhow::Result<ExtractReport> {
    let file_name = path.file_name().and_then(|n| n.to_str());
    let document_type = config.resolve_document_type(doc_type, file_name);
    debug!("Processing {} as {}", path.display(), document_type);
    extract_file(path, document_type, None, config, diagnostics)
}

fn best_value(report: &ExtractReport, question: Question) -> String {
    best_per_question(&report.fields)
        .into_iter()
        .find(|f| f.question_id == question.id())
        .map(|f| f.value.clone())
        .unwrap_or_default()
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "field_count",
        "parent_agi",
        "parent_wages",
        "parent_us_tax_paid",
        "used_ocr",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(report) = &result.report {
            wtr.write_record([
                filename,
                "success",
                report.document_type.as_str(),
                &report.fields.len().to_string(),
                &best_value(report, Question::ParentAgi),
                &best_value(report, Question::ParentWages),
                &best_value(report, Question::ParentUsTaxPaid),
                &report.used_ocr.to_string(),
                &report.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_inputs_skips_sidecars() {
        let dir = TempDir::new().unwrap();
        for name in ["a.pdf", "b.txt", "a.ocr.txt", "notes.md"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let pattern = format!("{}/*", dir.path().display());
        let names: Vec<String> = collect_inputs(&pattern)
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.txt"]);
    }
}
