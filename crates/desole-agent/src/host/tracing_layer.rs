//! Console bridge for `tracing`
//!
//! Treats `ERROR`-level `tracing` events as calls to the host's
//! error-logging function. The event message becomes the first argument and
//! the remaining fields one JSON object argument.

use std::{fmt, sync::Arc};

use desole_core::domain::HostValue;
use serde_json::{Map, Value};
use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::layer::{Context, Layer};

use super::slots::SlotHost;

/// Layer forwarding error events to a [`SlotHost`]'s console slot.
///
/// ```no_run
/// use desole_agent::ConsoleLayer;
/// use tracing_subscriber::{layer::SubscriberExt, Registry};
///
/// let subscriber = Registry::default().with(ConsoleLayer::global());
/// tracing::subscriber::set_global_default(subscriber).unwrap();
/// ```
#[derive(Clone)]
pub struct ConsoleLayer {
    host: Arc<SlotHost>,
}

impl ConsoleLayer {
    pub fn new(host: Arc<SlotHost>) -> Self {
        Self { host }
    }

    /// Layer over [`SlotHost::global`], the host default agents attach to.
    pub fn global() -> Self {
        Self::new(SlotHost::global().clone())
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::ERROR {
            return;
        }

        let mut visitor = ArgsVisitor::default();
        event.record(&mut visitor);

        let mut args = vec![HostValue::Text(visitor.message.unwrap_or_default())];
        if !visitor.fields.is_empty() {
            args.push(HostValue::Json(Value::Object(visitor.fields)));
        }

        self.host.console_error(&args);
    }
}

#[derive(Default)]
struct ArgsVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl ArgsVisitor {
    fn record_value(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for ArgsVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, Value::String(format!("{value:?}")));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use desole_core::{
        domain::ModuleKind,
        ports::{Handler, HostErrorSurface},
    };
    use tracing_subscriber::{layer::SubscriberExt, Registry};

    use super::*;

    fn capturing_host() -> (Arc<SlotHost>, Arc<Mutex<Vec<Vec<String>>>>) {
        let host = Arc::new(SlotHost::new());
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        host.set_handler(
            ModuleKind::Console,
            Some(Handler::console(move |args| {
                seen.lock()
                    .unwrap()
                    .push(args.iter().map(HostValue::stringify).collect());
            })),
        );
        (host, calls)
    }

    #[test]
    fn test_error_events_reach_console_slot() {
        let (host, calls) = capturing_host();
        let subscriber = Registry::default().with(ConsoleLayer::new(host));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(code = 7, retry = false, "database {} unreachable", "primary");
        });

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], "database primary unreachable");
        assert_eq!(calls[0][1], r#"{"code":7,"retry":false}"#);
    }

    #[test]
    fn test_lower_levels_are_ignored() {
        let (host, calls) = capturing_host();
        let subscriber = Registry::default().with(ConsoleLayer::new(host));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("disk almost full");
            tracing::info!(user = "x", "logged in");
        });

        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_message_only_event_has_single_argument() {
        let (host, calls) = capturing_host();
        let subscriber = Registry::default().with(ConsoleLayer::new(host));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("boom");
        });

        assert_eq!(calls.lock().unwrap()[0], vec!["boom".to_string()]);
    }
}
