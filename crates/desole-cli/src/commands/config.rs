//! Config command - View and validate Desole configuration
//!
//! Provides the `desole config` CLI command which:
//! 1. Shows the configuration and the resolved application identity
//! 2. Validates the configuration file and reports findings

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use desole_agent::ProcessEnvironment;
use desole_core::{AppIdentity, Config, HostEnvironment};
use tracing::info;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(config_path, format),
            ConfigCommand::Validate => execute_validate(config_path, format),
        }
    }
}

fn execute_show(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let config = Config::load_or_default(config_path);
    let app = AppIdentity::resolve(&config.app, ProcessEnvironment.hostname());

    info!(config_path = %config_path.display(), "Showing configuration");

    if format.is_json() {
        let json = serde_json::json!({
            "config_path": config_path.display().to_string(),
            "config": serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?,
            "app": serde_json::to_value(&app)
                .context("Failed to serialize application identity")?,
        });
        formatter.print_json(&json);
        return Ok(());
    }

    formatter.success(&format!("Configuration ({})", config_path.display()));
    formatter.info("");

    let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
    for line in yaml.lines() {
        formatter.info(line);
    }

    formatter.info("");
    formatter.info(&format!("Reporting as: {}", describe_app(&app)));

    Ok(())
}

fn execute_validate(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);

    // Load explicitly so parse errors surface instead of falling back to defaults
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            let message = if config_path.exists() {
                format!("Failed to parse configuration: {e:#}")
            } else {
                "Configuration file not found".to_string()
            };

            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": config_path.display().to_string(),
                    "errors": [message],
                }));
            } else {
                formatter.error(&message);
                formatter.info(&format!("File: {}", config_path.display()));
            }
            return Ok(());
        }
    };

    info!(config_path = %config_path.display(), "Validating configuration");

    let errors = config.validate();

    if format.is_json() {
        let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": config_path.display().to_string(),
            "errors": error_strings,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", config_path.display()));
    } else {
        formatter.error(&format!(
            "Configuration has {} problem{}:",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        ));
        formatter.info(&format!("File: {}", config_path.display()));
        formatter.info("");
        for error in &errors {
            formatter.info(&format!("  {} - {}", error.field, error.message));
        }
    }

    Ok(())
}

/// One-line `name version (stage)` summary; unknown parts are skipped.
fn describe_app(app: &AppIdentity) -> String {
    let mut parts = vec![app.name.clone().unwrap_or_else(|| "<unknown app>".to_string())];
    if let Some(version) = &app.version {
        parts.push(version.clone());
    }
    if let Some(stage) = &app.stage {
        parts.push(format!("({stage})"));
    }
    parts.join(" ")
}
