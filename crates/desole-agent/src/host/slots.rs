//! In-process handler slots
//!
//! `SlotHost` owns the three process-wide handler slots and dispatches
//! occurrences to whatever currently occupies them. Slot locks are released
//! before a handler runs, so handlers may freely swap slots themselves.

use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use desole_core::{
    domain::{HostValue, ModuleKind},
    ports::{
        ConsoleHandler, ErrorSignal, Handler, HostErrorSurface, OnErrorHandler, RejectionEvent,
        RejectionHandler,
    },
};
use tracing::warn;

static GLOBAL: LazyLock<Arc<SlotHost>> = LazyLock::new(|| Arc::new(SlotHost::with_defaults()));

/// A host error surface with three independently replaceable slots.
#[derive(Default)]
pub struct SlotHost {
    on_error: RwLock<Option<OnErrorHandler>>,
    console: RwLock<Option<ConsoleHandler>>,
    rejection: RwLock<Option<RejectionHandler>>,
}

impl SlotHost {
    /// Creates a host with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host whose console slot writes to stderr.
    pub fn with_defaults() -> Self {
        let host = Self::new();
        host.set_handler(ModuleKind::Console, Some(Handler::console(write_stderr)));
        host
    }

    /// The process-wide host.
    ///
    /// Agents built without an explicit host attach here, and it is the
    /// target to hand to [`install_panic_bridge`](super::install_panic_bridge)
    /// and [`ConsoleLayer`](super::ConsoleLayer). Its console slot starts
    /// out writing to stderr.
    pub fn global() -> &'static Arc<SlotHost> {
        &GLOBAL
    }

    /// Dispatch a fault to the global-error slot.
    pub fn raise_error(&self, signal: &ErrorSignal<'_>) {
        let handler = read(&self.on_error);
        if let Some(handler) = handler {
            handler(signal);
        }
    }

    /// Dispatch a call to the error-logging slot.
    pub fn console_error(&self, args: &[HostValue]) {
        let handler = read(&self.console);
        if let Some(handler) = handler {
            handler(args);
        }
    }

    /// Dispatch an unhandled asynchronous failure.
    pub fn unhandled_rejection(&self, event: &RejectionEvent) {
        let handler = read(&self.rejection);
        if let Some(handler) = handler {
            handler(event);
        }
    }
}

impl HostErrorSurface for SlotHost {
    fn handler(&self, kind: ModuleKind) -> Option<Handler> {
        match kind {
            ModuleKind::OnError => read(&self.on_error).map(Handler::OnError),
            ModuleKind::Console => read(&self.console).map(Handler::Console),
            ModuleKind::UnhandledRejection => read(&self.rejection).map(Handler::UnhandledRejection),
        }
    }

    fn set_handler(&self, kind: ModuleKind, handler: Option<Handler>) {
        match (kind, handler) {
            (ModuleKind::OnError, None) => write(&self.on_error, None),
            (ModuleKind::Console, None) => write(&self.console, None),
            (ModuleKind::UnhandledRejection, None) => write(&self.rejection, None),
            (ModuleKind::OnError, Some(Handler::OnError(h))) => write(&self.on_error, Some(h)),
            (ModuleKind::Console, Some(Handler::Console(h))) => write(&self.console, Some(h)),
            (ModuleKind::UnhandledRejection, Some(Handler::UnhandledRejection(h))) => {
                write(&self.rejection, Some(h))
            }
            (kind, Some(other)) => {
                warn!(slot = %kind, handler = %other.kind(), "Handler kind mismatch, slot left unchanged");
            }
        }
    }
}

fn read<T: Clone>(slot: &RwLock<Option<T>>) -> Option<T> {
    slot.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn write<T>(slot: &RwLock<Option<T>>, value: Option<T>) {
    *slot.write().unwrap_or_else(PoisonError::into_inner) = value;
}

fn write_stderr(args: &[HostValue]) {
    let line: Vec<String> = args.iter().map(HostValue::stringify).collect();
    eprintln!("{}", line.join(" "));
}
