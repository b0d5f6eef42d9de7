//! Configuration module for Desole.
//!
//! Provides the typed agent configuration, YAML loading, defaults, a
//! builder for programmatic use and advisory validation. The agent never
//! refuses a configuration: a missing endpoint only yields reports that
//! cannot be delivered.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::{AppIdentity, ModuleKind};

// ---------------------------------------------------------------------------
// Config struct
// ---------------------------------------------------------------------------

/// Agent configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Collection endpoint receiving the JSON reports.
    pub url: String,
    /// Default tags attached to every report without per-event tags.
    pub tags: BTreeMap<String, String>,
    /// Caller-defined suppression patterns. Reserved: stored, not enforced.
    pub ignore: Vec<String>,
    /// Interception points to hook.
    pub modules: BTreeSet<ModuleKind>,
    /// Default application identity.
    pub app: AppIdentity,
    /// When true the agent does not attach on construction.
    pub manual_init: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            tags: BTreeMap::new(),
            ignore: Vec::new(),
            modules: ModuleKind::ALL.into_iter().collect(),
            app: AppIdentity::default(),
            manual_init: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

impl Config {
    /// Configuration with all modules enabled, reporting to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_ignore(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignore = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict interception to the given modules.
    pub fn with_modules(mut self, modules: impl IntoIterator<Item = ModuleKind>) -> Self {
        self.modules = modules.into_iter().collect();
        self
    }

    pub fn with_app(mut self, app: AppIdentity) -> Self {
        self.app = app;
        self
    }

    pub fn manual_init(mut self, manual: bool) -> Self {
        self.manual_init = manual;
        self
    }

    /// Whether `kind` is among the enabled modules.
    pub fn is_enabled(&self, kind: ModuleKind) -> bool {
        self.modules.contains(&kind)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/desole/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("desole")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"ignore[2]"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Config {
    /// Check the configuration and return every finding.
    ///
    /// Advisory only; an empty vector means nothing looks wrong.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.url.trim().is_empty() {
            errors.push(ValidationError {
                field: "url".into(),
                message: "no endpoint configured; reports cannot be delivered".into(),
            });
        } else if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            errors.push(ValidationError {
                field: "url".into(),
                message: format!("expected an http(s) URL, got {}", self.url),
            });
        }

        if self.modules.is_empty() {
            errors.push(ValidationError {
                field: "modules".into(),
                message: "no modules enabled; nothing will be intercepted".into(),
            });
        }

        for (i, pattern) in self.ignore.iter().enumerate() {
            if let Err(e) = regex::Regex::new(pattern) {
                errors.push(ValidationError {
                    field: format!("ignore[{i}]"),
                    message: format!("invalid pattern: {e}"),
                });
            }
        }

        errors
    }
}
