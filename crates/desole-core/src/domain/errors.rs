//! Domain error types
//!
//! Errors raised while parsing configuration values. The interception
//! pipeline itself never returns errors.

use thiserror::Error;

/// Errors that can occur in Desole domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DesoleError {
    /// Unknown interception module name
    #[error("Unknown module: {0} (expected onerror, console or unhandledrejection)")]
    InvalidModule(String),

    /// Unknown severity name
    #[error("Unknown severity: {0} (expected error, warning or info)")]
    InvalidSeverity(String),
}
