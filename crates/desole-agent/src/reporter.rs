//! Report building, filtering and transmission
//!
//! `Reporter::track` turns a [`CaptureEvent`] into a [`Report`], drops it if
//! the noise filter matches, and otherwise hands the JSON body to the
//! transport. It never fails outward: a stack that cannot be serialized is
//! replaced by a fallback text and the report still goes out.

use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock},
};

use chrono::Utc;
use desole_core::{
    domain::{AppIdentity, CaptureEvent, EndpointInfo, HostValue, NativeError, Report, Severity},
    ports::{ConsoleHandler, HostEnvironment, IdGenerator, ReportTransport},
    Config,
};
use tracing::{debug, warn};

use crate::filter::NoiseFilter;

/// Prefix of the stack text used when stack serialization fails.
pub const STACK_FALLBACK_PREFIX: &str = "Stack trace conversion to string failed";

/// Diagnostic text used when not even the serialization error can be described.
const UNKNOWN_ERROR: &str = "unknown error";

/// What `track` did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Handed to the transport
    Sent,
    /// Suppressed by the noise filter
    Filtered,
    /// The report could not be encoded
    Dropped,
}

/// Builds and transmits reports for one agent.
pub struct Reporter {
    url: String,
    tags: BTreeMap<String, String>,
    app: AppIdentity,
    environment: Arc<dyn HostEnvironment>,
    ids: Arc<dyn IdGenerator>,
    transport: Arc<dyn ReportTransport>,
    /// The host's original logging function, used for local diagnostics.
    diagnostics: RwLock<Option<ConsoleHandler>>,
}

impl Reporter {
    /// Creates a reporter. `app` is the already-resolved identity.
    pub fn new(
        config: &Config,
        app: AppIdentity,
        environment: Arc<dyn HostEnvironment>,
        ids: Arc<dyn IdGenerator>,
        transport: Arc<dyn ReportTransport>,
    ) -> Self {
        Self {
            url: config.url.clone(),
            tags: config.tags.clone(),
            app,
            environment,
            ids,
            transport,
            diagnostics: RwLock::new(None),
        }
    }

    /// Build, filter and transmit one event.
    pub fn track(&self, event: CaptureEvent) -> TrackOutcome {
        let report = self.build_report(event);

        let body = match serde_json::to_string(&report) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to encode report");
                return TrackOutcome::Dropped;
            }
        };

        if !NoiseFilter::should_report(&report.message, &report.stack) {
            debug!(error_type = %report.error_type, "Report filtered out");
            self.diagnose(&[HostValue::Text(format!("filtered out: {body}"))]);
            return TrackOutcome::Filtered;
        }

        debug!(url = %self.url, severity = %report.severity, error_type = %report.error_type, "Sending report");
        self.transport.send(&self.url, body);
        TrackOutcome::Sent
    }

    /// Report a caught error.
    pub fn capture_exception(&self, error: &NativeError) -> TrackOutcome {
        let event = CaptureEvent::new(Severity::Error, error.message.clone())
            .with_type(error.name.clone())
            .with_stack(error.stack.clone().unwrap_or_default());
        self.track(event)
    }

    /// Resolve every report field from the event and the configuration.
    pub fn build_report(&self, event: CaptureEvent) -> Report {
        let stack = self.normalize_stack(&event.stack);
        let overrides = event.endpoint.unwrap_or_default();

        Report {
            severity: event.severity,
            error_type: event.error_type,
            message: event.message,
            timestamp: event
                .timestamp
                .unwrap_or_else(|| Utc::now().timestamp_millis()),
            resource: event
                .resource
                .or_else(|| self.environment.location_href()),
            app: match &event.app {
                Some(app) => app.or(&self.app),
                None => self.app.clone(),
            },
            endpoint: EndpointInfo {
                id: overrides.id.unwrap_or_else(|| self.ids.new_id()),
                language: overrides.language.or_else(|| self.environment.language()),
                platform: overrides.platform.or_else(|| self.environment.platform()),
            },
            tags: event.tags.unwrap_or_else(|| self.tags.clone()),
            stack,
        }
    }

    /// The agent's resolved application identity.
    pub fn app(&self) -> &AppIdentity {
        &self.app
    }

    /// Collection endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Route local diagnostics to `sink`; `None` keeps them in `tracing` only.
    pub(crate) fn set_diagnostic_sink(&self, sink: Option<ConsoleHandler>) {
        *self
            .diagnostics
            .write()
            .unwrap_or_else(PoisonError::into_inner) = sink;
    }

    fn normalize_stack(&self, stack: &HostValue) -> String {
        if let Some(text) = stack.as_text() {
            return text.to_string();
        }

        match stack.to_json_string() {
            Ok(json) => json,
            Err(e) => {
                debug!(error = %e, "{STACK_FALLBACK_PREFIX}");
                self.diagnose(&[
                    HostValue::from(STACK_FALLBACK_PREFIX),
                    HostValue::Text(e.to_string()),
                ]);
                let detail = serde_json::to_string(&e.to_string())
                    .unwrap_or_else(|_| UNKNOWN_ERROR.to_string());
                format!("{STACK_FALLBACK_PREFIX}: {detail}")
            }
        }
    }

    fn diagnose(&self, args: &[HostValue]) {
        let sink = self
            .diagnostics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(sink) = sink {
            sink(args);
        }
    }
}
