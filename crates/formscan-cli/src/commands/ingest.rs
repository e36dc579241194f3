//! Ingest command - upload application forms into the record store.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing::{debug, info};

use formscan_core::{BatchPolicy, UploadedFile};

use super::output::{stored_csv, stored_text, OutputFormat};
use super::{build_service, load_config};

/// Arguments for the ingest command.
#[derive(Args)]
pub struct IngestArgs {
    /// Form files to ingest (PDF, JPG, JPEG or PNG)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Keep going after a file fails instead of stopping
    #[arg(long)]
    continue_on_error: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: IngestArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let service = build_service(&config)?;

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        files.push(UploadedFile::from_path(path)?);
    }

    let policy = if args.continue_on_error {
        BatchPolicy::ContinueOnError
    } else {
        BatchPolicy::FailFast
    };

    info!("Ingesting {} file(s) with {:?}", files.len(), policy);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Processing {} file(s)...", files.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let outcome = service.upload(files, policy)?;
    pb.finish_and_clear();

    if policy == BatchPolicy::FailFast {
        if let Some(failure) = outcome.failures().next() {
            anyhow::bail!("{}", failure);
        }
    }

    let message = outcome.message();
    let errors: Vec<_> = outcome
        .failures()
        .map(|f| json!({ "file": f.filename, "error": f.source.to_string() }))
        .collect();
    for failure in outcome.failures() {
        eprintln!("{} {}", style("✗").red(), failure);
    }

    let stored = outcome.into_stored();
    let output = match args.format {
        OutputFormat::Json => {
            let mut body = json!({ "message": message, "results": stored });
            if !errors.is_empty() {
                body["errors"] = errors.into();
            }
            serde_json::to_string_pretty(&body)?
        }
        OutputFormat::Csv => stored_csv(&stored)?,
        OutputFormat::Text => format!("{}\n\n{}", message, stored_text(&stored)),
    };

    println!("{}", output);
    debug!("Total ingest time: {:?}", start.elapsed());

    Ok(())
}
