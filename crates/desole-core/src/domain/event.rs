//! Capture events
//!
//! A `CaptureEvent` is what a hook extracts from one intercepted occurrence,
//! before endpoint, tag and identity enrichment.

use std::collections::BTreeMap;

use super::{module::Severity, report::AppIdentity, value::HostValue};

/// Per-event endpoint details; unset fields fall back to the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointOverride {
    pub id: Option<String>,
    pub language: Option<String>,
    pub platform: Option<String>,
}

/// The normalized record of one intercepted fault occurrence.
#[derive(Debug, Clone)]
pub struct CaptureEvent {
    pub severity: Severity,
    /// Best-effort trace. Non-text values are serialized when the report is built.
    pub stack: HostValue,
    /// Error class name, empty when unknown
    pub error_type: String,
    pub message: String,
    pub timestamp: Option<i64>,
    pub resource: Option<String>,
    pub app: Option<AppIdentity>,
    pub endpoint: Option<EndpointOverride>,
    /// Replaces the configured default tags wholesale when set
    pub tags: Option<BTreeMap<String, String>>,
}

impl CaptureEvent {
    /// Creates an event with an empty stack and type.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            stack: HostValue::Text(String::new()),
            error_type: String::new(),
            message: message.into(),
            timestamp: None,
            resource: None,
            app: None,
            endpoint: None,
            tags: None,
        }
    }

    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = error_type.into();
        self
    }

    pub fn with_stack(mut self, stack: impl Into<HostValue>) -> Self {
        self.stack = stack.into();
        self
    }

    /// Sets the timestamp (milliseconds since the Unix epoch)
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_app(mut self, app: AppIdentity) -> Self {
        self.app = Some(app);
        self
    }

    pub fn with_endpoint(mut self, endpoint: EndpointOverride) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = Some(tags);
        self
    }
}
