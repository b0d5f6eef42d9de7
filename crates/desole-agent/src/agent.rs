//! Interception agent
//!
//! The `Agent` owns the configuration and the hook lifecycle. `attach`
//! saves the handler occupying each enabled slot of the host error surface
//! and installs a reporting hook in its place; `detach` puts the saved
//! handlers back. Every hook reports first and then forwards the original
//! arguments to the saved handler, so the host's default handling is kept.
//!
//! ## Design Notes
//!
//! - Each module tracks whether it is attached. A second `attach` leaves
//!   attached modules alone, so the true original is never overwritten by
//!   the agent's own hook.
//! - Hooks capture the reporter and their saved original when installed
//!   and never lock agent state while running: they may fire during a panic.
//! - An occurrence raised on a thread that is already inside a hook is
//!   forwarded to the original handler but not reported.

use std::{
    cell::Cell,
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use desole_core::{
    domain::{AppIdentity, CaptureEvent, CapturedFault, HostValue, ModuleKind, NativeError, Severity},
    ports::{
        ConsoleHandler, ErrorSignal, Handler, HostEnvironment, HostErrorSurface, IdGenerator,
        RejectionEvent, ReportTransport,
    },
    Config,
};
use tracing::{debug, info, warn};

use crate::{
    environment::{ProcessEnvironment, UuidGenerator},
    host::SlotHost,
    reporter::{Reporter, TrackOutcome},
    transport::HttpTransport,
};

/// Error type reported for intercepted logging calls.
pub const CONSOLE_ERROR_TYPE: &str = "ConsoleError";

/// Error type reported for unhandled failures without a type of their own.
pub const UNHANDLED_REJECTION_TYPE: &str = "UnhandledPromiseRejection";

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Agent`]; every collaborator has a process-level default.
pub struct AgentBuilder {
    config: Config,
    host: Option<Arc<dyn HostErrorSurface>>,
    environment: Option<Arc<dyn HostEnvironment>>,
    transport: Option<Arc<dyn ReportTransport>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl AgentBuilder {
    /// Error surface to hook. Defaults to [`SlotHost::global`].
    pub fn host(mut self, host: Arc<dyn HostErrorSurface>) -> Self {
        self.host = Some(host);
        self
    }

    /// Defaults to [`ProcessEnvironment`].
    pub fn environment(mut self, environment: Arc<dyn HostEnvironment>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Defaults to [`HttpTransport`].
    pub fn transport(mut self, transport: Arc<dyn ReportTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Defaults to [`UuidGenerator`].
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Builds the agent and, unless `manual_init` is set, attaches it.
    ///
    /// The configuration is not validated: an empty or malformed URL only
    /// means reports go nowhere.
    pub fn build(self) -> Agent {
        let host = self.host.unwrap_or_else(|| {
            let global: Arc<dyn HostErrorSurface> = SlotHost::global().clone();
            global
        });
        let environment = self
            .environment
            .unwrap_or_else(|| Arc::new(ProcessEnvironment));
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HttpTransport::new()));
        let ids = self.ids.unwrap_or_else(|| Arc::new(UuidGenerator));

        let app = AppIdentity::resolve(&self.config.app, environment.hostname());
        let reporter = Arc::new(Reporter::new(
            &self.config,
            app,
            environment,
            ids,
            transport,
        ));

        let agent = Agent {
            config: self.config,
            host,
            reporter,
            saved: Mutex::new(BTreeMap::new()),
        };

        if !agent.config.manual_init {
            agent.attach();
        }

        agent
    }
}

// ============================================================================
// Agent
// ============================================================================

/// Installs and removes the reporting hooks.
pub struct Agent {
    config: Config,
    host: Arc<dyn HostErrorSurface>,
    reporter: Arc<Reporter>,
    /// Attached modules and the handler each one replaced
    saved: Mutex<BTreeMap<ModuleKind, Option<Handler>>>,
}

impl Agent {
    pub fn builder(config: Config) -> AgentBuilder {
        AgentBuilder {
            config,
            host: None,
            environment: None,
            transport: None,
            ids: None,
        }
    }

    /// Builds an agent hooked into `host` with default collaborators.
    pub fn new(config: Config, host: Arc<dyn HostErrorSurface>) -> Self {
        Self::builder(config).host(host).build()
    }

    /// Install the reporting hook for every enabled module not yet attached.
    pub fn attach(&self) {
        let mut saved = self.lock_saved();

        for kind in self.config.modules.iter().copied() {
            if saved.contains_key(&kind) {
                warn!(module = %kind, "Module already attached, keeping the saved original handler");
                continue;
            }

            let original = self.host.handler(kind);
            let hook = match kind {
                ModuleKind::OnError => self.on_error_hook(original.clone()),
                ModuleKind::Console => self.console_hook(original.clone()),
                ModuleKind::UnhandledRejection => self.rejection_hook(original.clone()),
            };
            self.host.set_handler(kind, Some(hook));
            saved.insert(kind, original);
            info!(module = %kind, "Attached");
        }

        // Diagnostics always go to the logging function the agent did not install.
        let sink = match saved.get(&ModuleKind::Console) {
            Some(original) => console_handler(original.clone()),
            None => console_handler(self.host.handler(ModuleKind::Console)),
        };
        self.reporter.set_diagnostic_sink(sink);
    }

    /// Restore the saved handler of every attached module.
    ///
    /// A module whose slot was empty before `attach` is emptied again.
    /// Modules that are not attached are left untouched.
    pub fn detach(&self) {
        let mut saved = self.lock_saved();

        for (kind, original) in std::mem::take(&mut *saved) {
            self.host.set_handler(kind, original);
            info!(module = %kind, "Detached");
        }

        self.reporter.set_diagnostic_sink(None);
    }

    /// Whether the hook for `kind` is currently installed.
    pub fn is_attached(&self, kind: ModuleKind) -> bool {
        self.lock_saved().contains_key(&kind)
    }

    /// Report an event directly.
    pub fn track(&self, event: CaptureEvent) -> TrackOutcome {
        self.reporter.track(event)
    }

    /// Report a caught error.
    pub fn capture_exception(&self, error: &NativeError) -> TrackOutcome {
        self.reporter.capture_exception(error)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The resolved application identity.
    pub fn app(&self) -> &AppIdentity {
        self.reporter.app()
    }

    pub fn reporter(&self) -> &Arc<Reporter> {
        &self.reporter
    }

    fn lock_saved(&self) -> MutexGuard<'_, BTreeMap<ModuleKind, Option<Handler>>> {
        self.saved.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn on_error_hook(&self, original: Option<Handler>) -> Handler {
        let reporter = Arc::clone(&self.reporter);
        let original = match original {
            Some(Handler::OnError(handler)) => Some(handler),
            _ => None,
        };

        Handler::on_error(move |signal| {
            report_once(|| {
                reporter.track(error_event(signal));
            });
            if let Some(original) = &original {
                original(signal);
            }
        })
    }

    fn console_hook(&self, original: Option<Handler>) -> Handler {
        let reporter = Arc::clone(&self.reporter);
        let original = console_handler(original);

        Handler::console(move |args| {
            report_once(|| {
                reporter.track(console_event(args));
            });
            if let Some(original) = &original {
                original(args);
            }
        })
    }

    fn rejection_hook(&self, original: Option<Handler>) -> Handler {
        let reporter = Arc::clone(&self.reporter);
        let original = match original {
            Some(Handler::UnhandledRejection(handler)) => Some(handler),
            _ => None,
        };

        Handler::unhandled_rejection(move |event| {
            report_once(|| {
                reporter.track(rejection_event(event));
            });
            if let Some(original) = &original {
                original(event);
            }
        })
    }
}

fn console_handler(handler: Option<Handler>) -> Option<ConsoleHandler> {
    match handler {
        Some(Handler::Console(handler)) => Some(handler),
        _ => None,
    }
}

// ============================================================================
// Event extraction
// ============================================================================

/// Capture event for a global-error callback invocation.
pub fn error_event(signal: &ErrorSignal<'_>) -> CaptureEvent {
    let fault = CapturedFault::classify(signal.error.clone());
    let message = signal
        .message
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fault.describe());

    CaptureEvent::new(Severity::Error, message)
        .with_type(fault.error_type())
        .with_stack(fault.stack_text())
}

/// Capture event for an intercepted logging call.
pub fn console_event(args: &[HostValue]) -> CaptureEvent {
    let stack = args
        .iter()
        .map(HostValue::stringify)
        .collect::<Vec<_>>()
        .join(", ");

    let message = args
        .first()
        .and_then(|first| first.field("message"))
        .map(|m| m.stringify())
        .filter(|m| !m.is_empty())
        .or_else(|| args.first().map(HostValue::to_plain_string))
        .unwrap_or_default();

    CaptureEvent::new(Severity::Info, message)
        .with_type(CONSOLE_ERROR_TYPE)
        .with_stack(stack)
}

/// Capture event for an unhandled asynchronous failure.
pub fn rejection_event(event: &RejectionEvent) -> CaptureEvent {
    let error_type = event
        .kind
        .clone()
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| UNHANDLED_REJECTION_TYPE.to_string());
    let message = event
        .reason
        .as_ref()
        .map(HostValue::to_plain_string)
        .unwrap_or_default();

    CaptureEvent::new(Severity::Warning, message)
        .with_type(error_type)
        .with_stack("")
}

// ============================================================================
// Re-entrancy guard
// ============================================================================

thread_local! {
    static IN_HOOK: Cell<bool> = const { Cell::new(false) };
}

struct HookGuard;

impl Drop for HookGuard {
    fn drop(&mut self) {
        IN_HOOK.with(|flag| flag.set(false));
    }
}

/// Run `report` unless this thread is already reporting an occurrence.
fn report_once(report: impl FnOnce()) {
    if IN_HOOK.with(|flag| flag.replace(true)) {
        debug!("Nested occurrence raised while reporting, forwarding only");
        return;
    }
    let _guard = HookGuard;
    report();
}
