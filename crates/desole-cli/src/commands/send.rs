//! Send command - Report a single event to the collector
//!
//! Builds an agent from the configuration without hooking anything, tracks
//! one event and waits briefly so the background delivery can complete
//! before the process exits.

use std::{path::Path, time::Duration};

use anyhow::{bail, Result};
use clap::Args;
use desole_agent::{Agent, TrackOutcome};
use desole_core::{domain::CaptureEvent, Config, Severity};
use tracing::info;

use crate::output::{get_formatter, OutputFormat};

/// Time given to the fire-and-forget request before exiting.
const DELIVERY_GRACE: Duration = Duration::from_millis(750);

#[derive(Debug, Args)]
pub struct SendCommand {
    /// Report message
    #[arg(short, long)]
    message: String,

    /// Error type, e.g. "TypeError"
    #[arg(long = "type", default_value = "")]
    error_type: String,

    /// error, warning or info
    #[arg(long, default_value = "error")]
    severity: Severity,

    /// Stack trace text
    #[arg(long)]
    stack: Option<String>,

    /// Extra tag (repeatable), as key=value
    #[arg(long = "tag", value_parser = parse_tag)]
    tags: Vec<(String, String)>,

    /// Collector URL, overriding the configured one
    #[arg(long)]
    url: Option<String>,
}

impl SendCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let mut config = Config::load_or_default(config_path).manual_init(true);
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        for (key, value) in &self.tags {
            config = config.with_tag(key.as_str(), value.as_str());
        }

        if config.url.trim().is_empty() {
            bail!(
                "No collector URL configured; set `url` in {} or pass --url",
                config_path.display()
            );
        }

        let agent = Agent::builder(config).build();
        info!(url = %agent.config().url, "Sending report");

        let outcome = agent.track(self.event());
        if outcome == TrackOutcome::Sent {
            tokio::time::sleep(DELIVERY_GRACE).await;
        }

        formatter.outcome(outcome, &agent.config().url);

        Ok(())
    }

    fn event(&self) -> CaptureEvent {
        let event =
            CaptureEvent::new(self.severity, self.message.as_str()).with_type(self.error_type.as_str());
        match &self.stack {
            Some(stack) => event.with_stack(stack.as_str()),
            None => event,
        }
    }
}

/// Parse a `key=value` tag argument.
fn parse_tag(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        assert_eq!(
            parse_tag("release=r42"),
            Ok(("release".to_string(), "r42".to_string()))
        );
        assert_eq!(
            parse_tag("query=a=b"),
            Ok(("query".to_string(), "a=b".to_string()))
        );
        assert!(parse_tag("=x").is_err());
        assert!(parse_tag("novalue").is_err());
    }

    #[test]
    fn test_event_from_arguments() {
        let cmd = SendCommand {
            message: "db down".to_string(),
            error_type: "ConnectionError".to_string(),
            severity: Severity::Warning,
            stack: Some("at connect".to_string()),
            tags: Vec::new(),
            url: None,
        };

        let event = cmd.event();
        assert_eq!(event.severity, Severity::Warning);
        assert_eq!(event.error_type, "ConnectionError");
        assert_eq!(event.message, "db down");
        assert_eq!(event.stack.as_text(), Some("at connect"));
    }

    #[tokio::test]
    async fn test_missing_url_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = SendCommand {
            message: "m".to_string(),
            error_type: String::new(),
            severity: Severity::Error,
            stack: None,
            tags: Vec::new(),
            url: None,
        };

        let result = cmd
            .execute(&dir.path().join("missing.yaml"), OutputFormat::Json)
            .await;
        assert!(result.is_err());
    }
}
