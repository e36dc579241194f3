//! Extract command - run recovery and field extraction on one file without storing.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use formscan_core::{DocumentKind, ExtractionReport, OcrTextRecovery, RecoveredText, TextRecovery};

use super::output::{record_text, records_csv, OutputFormat};
use super::{build_rules, load_config};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or image, or a text file with --from-text)
    #[arg(required = true)]
    input: PathBuf,

    /// Treat the input as already-recognized plain text and skip OCR
    #[arg(long)]
    from_text: bool,

    /// Include unmatched fields and timing in the output
    #[arg(long)]
    report: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let rules = build_rules(&config)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let text = if args.from_text {
        RecoveredText::new(fs::read_to_string(&args.input)?)
    } else {
        DocumentKind::from_path(&args.input)?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        pb.set_message("Running OCR...");

        let text = OcrTextRecovery::from_config(&config).recover(&args.input)?;
        pb.finish_and_clear();
        text
    };

    if text.as_str().trim().is_empty() {
        warn!("No text recovered from {}", args.input.display());
    }

    let report = ExtractionReport::run(&rules, text.as_str());

    let output = match args.format {
        OutputFormat::Json if args.report => serde_json::to_string_pretty(&report)?,
        OutputFormat::Json => serde_json::to_string_pretty(&report.record)?,
        OutputFormat::Csv => records_csv([(None, &report.record)], false)?,
        OutputFormat::Text => {
            let mut text = record_text(&report.record);
            if args.report {
                text.push_str(&format!(
                    "\nUnmatched fields ({}): {}\nProcessing time: {}ms\n",
                    report.missing_fields.len(),
                    report.missing_fields.join(", "),
                    report.processing_time_ms
                ));
            }
            text
        }
    };

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

    if args.report && !matches!(args.format, OutputFormat::Json | OutputFormat::Text) {
        eprintln!(
            "{} {} unmatched field(s): {}",
            style("ℹ").blue(),
            report.missing_fields.len(),
            report.missing_fields.join(", ")
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
