//! Records command - list, search and look up stored application records.

use clap::{Args, Subcommand};
use serde_json::json;

use formscan_core::{FormscanError, SearchQuery, StoredRecord};

use super::output::{stored_csv, stored_text, OutputFormat};
use super::{build_service, load_config};

/// Arguments for the records command.
#[derive(Args)]
pub struct RecordsArgs {
    #[command(subcommand)]
    command: RecordsCommand,
}

#[derive(Subcommand)]
enum RecordsCommand {
    /// List every stored record
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Search records by name and/or email (case-insensitive substring)
    Search {
        /// Substring of the applicant name
        #[arg(long)]
        name: Option<String>,

        /// Substring of the email address
        #[arg(long)]
        email: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Show one record by id
    Get {
        /// Record id
        id: String,
    },
}

pub async fn run(args: RecordsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let service = build_service(&config)?;

    match args.command {
        RecordsCommand::List { format } => print_records(&service.list()?, format),
        RecordsCommand::Search {
            name,
            email,
            format,
        } => {
            let records = service.search(&SearchQuery { name, email })?;
            print_records(&records, format)
        }
        RecordsCommand::Get { id } => match service.get(&id) {
            Ok(record) => {
                println!("{}", serde_json::to_string_pretty(&record)?);
                Ok(())
            }
            Err(FormscanError::NotFound(_)) => anyhow::bail!("Record not found: {}", id),
            Err(e) => Err(e.into()),
        },
    }
}

fn print_records(records: &[StoredRecord], format: OutputFormat) -> anyhow::Result<()> {
    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({ "records": records }))?,
        OutputFormat::Csv => stored_csv(records)?,
        OutputFormat::Text if records.is_empty() => "No records found.".to_string(),
        OutputFormat::Text => stored_text(records),
    };
    println!("{}", output);
    Ok(())
}
