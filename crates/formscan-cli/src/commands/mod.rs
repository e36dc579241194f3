//! Subcommands and the helpers they share.

pub mod config;
pub mod extract;
pub mod ingest;
pub mod output;
pub mod records;
pub mod rules;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use formscan_core::models::config::FormscanConfig;
use formscan_core::{open_store, FormRules, IntakeService, OcrTextRecovery};

/// Service type used by commands that touch the record store.
pub type Service = IntakeService<OcrTextRecovery, FormRules>;

/// Config file to use: `-c` if given, otherwise the per-user default.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(FormscanConfig::default_path)
}

/// Load the configuration, falling back to defaults when no file exists.
///
/// An explicit `-c` path must exist.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FormscanConfig> {
    if let Some(path) = config_path {
        return FormscanConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let default_path = FormscanConfig::default_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(FormscanConfig::from_file(&default_path)?)
    } else {
        Ok(FormscanConfig::default())
    }
}

/// Compile the configured rule set.
pub fn build_rules(config: &FormscanConfig) -> anyhow::Result<FormRules> {
    Ok(FormRules::compile(
        &config.extraction.patterns,
        config.extraction.max_qualifications,
    )?)
}

pub fn build_service(config: &FormscanConfig) -> anyhow::Result<Service> {
    let rules = build_rules(config)?;
    let store = open_store(&config.storage)?;
    Ok(IntakeService::new(
        OcrTextRecovery::from_config(config),
        rules,
        store,
        config.upload.clone(),
    ))
}
