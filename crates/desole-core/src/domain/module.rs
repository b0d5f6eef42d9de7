//! Interception modules and report severities

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::errors::DesoleError;

/// One of the three interception points the agent can hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// The global uncaught-fault callback
    #[serde(rename = "onerror")]
    OnError,
    /// The error-logging function
    #[serde(rename = "console")]
    Console,
    /// The unhandled asynchronous failure callback
    #[serde(rename = "unhandledrejection")]
    UnhandledRejection,
}

impl ModuleKind {
    /// All modules, in attach order.
    pub const ALL: [ModuleKind; 3] = [
        ModuleKind::OnError,
        ModuleKind::Console,
        ModuleKind::UnhandledRejection,
    ];

    /// Configuration name of the module.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::OnError => "onerror",
            ModuleKind::Console => "console",
            ModuleKind::UnhandledRejection => "unhandledrejection",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleKind {
    type Err = DesoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onerror" => Ok(ModuleKind::OnError),
            "console" => Ok(ModuleKind::Console),
            "unhandledrejection" => Ok(ModuleKind::UnhandledRejection),
            other => Err(DesoleError::InvalidModule(other.to_string())),
        }
    }
}

/// Severity attached to every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(s)
    }
}

impl FromStr for Severity {
    type Err = DesoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(DesoleError::InvalidSeverity(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_kind_parse() {
        assert_eq!("onerror".parse::<ModuleKind>().unwrap(), ModuleKind::OnError);
        assert_eq!(" Console ".parse::<ModuleKind>().unwrap(), ModuleKind::Console);
        assert_eq!(
            "unhandledrejection".parse::<ModuleKind>().unwrap(),
            ModuleKind::UnhandledRejection
        );
        assert_eq!(
            "window".parse::<ModuleKind>(),
            Err(DesoleError::InvalidModule("window".to_string()))
        );
    }

    #[test]
    fn test_module_kind_serde_names() {
        let json = serde_json::to_string(&ModuleKind::ALL).unwrap();
        assert_eq!(json, r#"["onerror","console","unhandledrejection"]"#);

        for kind in ModuleKind::ALL {
            assert_eq!(kind.to_string().parse::<ModuleKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
        assert!("fatal".parse::<Severity>().is_err());
    }
}
