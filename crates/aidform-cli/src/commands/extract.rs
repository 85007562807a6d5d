//! Extract command - pull financial-aid fields out of a single document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use aidform_core::extraction::{IncomeBlockDetector, TaxBlockDetector, normalize_whitespace};
use aidform_core::{
    AidformConfig, Diagnostics, DocumentPipeline, DocumentType, ExtractedField, Question,
};

use super::sidecar::SidecarRecognizer;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Document type: 1040, W-2, 1099, "SSN Letter" or Other
    /// (default: inferred from the file name)
    #[arg(short = 't', long, value_parser = parse_doc_type)]
    doc_type: Option<DocumentType>,

    /// Text recognized by an external OCR tool (default: <input>.ocr.txt if present)
    #[arg(long)]
    ocr_text: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report missing fields, conflicts and suggestions
    #[arg(long)]
    diagnostics: bool,

    /// Print the numeric block candidates considered for a 1040
    #[arg(long)]
    debug_blocks: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per field
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub(crate) fn parse_doc_type(s: &str) -> Result<DocumentType, String> {
    DocumentType::parse(s).ok_or_else(|| {
        let names: Vec<&str> = DocumentType::ALL.iter().map(|t| t.as_str()).collect();
        format!("unknown document type '{}', expected one of: {}", s, names.join(", "))
    })
}

/// Everything extracted from one input file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractReport {
    pub file: String,
    pub document_type: DocumentType,
    pub processed_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub used_ocr: bool,
    pub fields: Vec<ExtractedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
    #[serde(skip)]
    pub text: String,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let file_name = args.input.file_name().and_then(|n| n.to_str());
    let document_type = config.resolve_document_type(args.doc_type, file_name);
    info!(
        "Extracting {} as {}",
        args.input.display(),
        document_type
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting fields from {}...", args.input.display()));

    let report = extract_file(
        &args.input,
        document_type,
        args.ocr_text.as_deref(),
        &config,
        args.diagnostics,
    )?;

    pb.finish_and_clear();

    if args.debug_blocks {
        print_block_candidates(&report);
    }

    let output = format_report(&report, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Run the pipeline over one file.
///
/// PDFs go through the text layer with the OCR sidecar as fallback; any
/// other file is read as already-extracted text.
pub(crate) fn extract_file(
    input: &Path,
    document_type: DocumentType,
    ocr_text: Option<&Path>,
    config: &AidformConfig,
    with_diagnostics: bool,
) -> anyhow::Result<ExtractReport> {
    let recognizer = match ocr_text {
        Some(path) => Some(SidecarRecognizer::new(path)),
        None => SidecarRecognizer::discover(input),
    };
    if let Some(r) = &recognizer {
        debug!("Using OCR text from {}", r.path().display());
    }

    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let processed = if extension == "pdf" {
        let data = fs::read(input)?;
        let mut pipeline = DocumentPipeline::new(config.clone());
        if let Some(r) = recognizer {
            pipeline = pipeline.with_recognizer(Box::new(r));
        }
        pipeline.process_pdf(&data, document_type)
    } else {
        let bytes = fs::read(input)?;
        let text = String::from_utf8_lossy(&bytes);
        let pipeline = DocumentPipeline::new(config.clone());
        // Only read the sidecar when the pipeline will use it.
        let ocr = match &recognizer {
            Some(r) if pipeline.needs_ocr(&text) => Some(r.read()?),
            _ => None,
        };
        pipeline.process_text(&text, ocr.as_deref(), document_type)
    };

    let diagnostics =
        with_diagnostics.then(|| Diagnostics::build_with(&processed.fields, &config.review));

    Ok(ExtractReport {
        file: input.display().to_string(),
        document_type,
        processed_at: Utc::now(),
        processing_time_ms: processed.processing_time_ms,
        used_ocr: processed.ocr_text.is_some(),
        fields: processed.fields,
        diagnostics,
        text: processed.text,
    })
}

fn print_block_candidates(report: &ExtractReport) {
    if !report.document_type.is_tabular() {
        eprintln!(
            "{} Block detection only applies to 1040 documents",
            style("ℹ").blue()
        );
        return;
    }

    let text = normalize_whitespace(&report.text);
    let income = IncomeBlockDetector::new().candidates(&text);
    let tax = TaxBlockDetector::new().candidates(&text);

    eprintln!("{}", style(format!("Income runs ({}):", income.len())).bold());
    for candidate in &income {
        let status = match candidate.rejection {
            Some(reason) => style(format!("{:?}", reason)).yellow().to_string(),
            None => style("plausible".to_string()).green().to_string(),
        };
        eprintln!(
            "  [{}] sum={} values={}",
            status,
            candidate.sum,
            candidate.values.join(" ")
        );
    }

    eprintln!("{}", style(format!("Tax runs ({}):", tax.len())).bold());
    for candidate in &tax {
        eprintln!("  sum={} values={}", candidate.sum, candidate.values.join(" "));
    }
}

pub(crate) fn format_report(report: &ExtractReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_fields_csv(&report.fields),
        OutputFormat::Text => Ok(format_report_text(report)),
    }
}

pub(crate) fn format_fields_csv(fields: &[ExtractedField]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["question_id", "label", "value", "confidence", "source"])?;

    for field in fields {
        wtr.write_record([
            field.question_id.as_str(),
            field.label.as_str(),
            field.value.as_str(),
            &format!("{:.2}", field.confidence),
            field.source.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Dollar amounts get a `$` sign, negatives as `-$1234`.
fn display_value(field: &ExtractedField) -> String {
    let is_money = Question::parse(&field.question_id).is_some_and(|q| q.is_money());
    if !is_money {
        return field.value.clone();
    }
    match field.value.strip_prefix('-') {
        Some(amount) => format!("-${}", amount),
        None => format!("${}", field.value),
    }
}

fn format_report_text(report: &ExtractReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("File: {}\n", report.file));
    output.push_str(&format!("Document type: {}\n", report.document_type.label()));
    if report.used_ocr {
        output.push_str("Text source: OCR fallback\n");
    }
    output.push('\n');

    if report.fields.is_empty() {
        output.push_str("No fields found.\n");
    } else {
        output.push_str("Fields:\n");
        for field in &report.fields {
            output.push_str(&format!(
                "  {:<28} {:<16} {:>3.0}%  ({}, {})\n",
                field.label,
                display_value(field),
                field.confidence * 100.0,
                field.question_id,
                field.source
            ));
        }
    }

    if let Some(diagnostics) = &report.diagnostics {
        for missing in &diagnostics.missing {
            output.push_str(&format!(
                "\nMissing for {}:\n  {}\n",
                missing.category,
                missing.items.join(", ")
            ));
        }
        if !diagnostics.conflicts.is_empty() {
            output.push_str("\nConflicts:\n");
            for conflict in &diagnostics.conflicts {
                output.push_str(&format!("  - {}\n", conflict));
            }
        }
        if !diagnostics.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in &diagnostics.suggestions {
                output.push_str(&format!("  - {}\n", suggestion));
            }
        }
    }

    output
}
