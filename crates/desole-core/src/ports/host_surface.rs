//! Host error surface port
//!
//! The host runtime exposes three process-wide handler slots: the global
//! fault callback, the error-logging function and the unhandled-failure
//! callback. The agent saves whatever occupies a slot, installs its own
//! hook, and later puts the saved handler back.
//!
//! ## Design Notes
//!
//! - Handlers are reference counted so a restored handler is the very same
//!   object that was saved (`Handler::ptr_eq`).
//! - `set_handler(kind, None)` empties a slot.

use std::{fmt, panic::PanicHookInfo, sync::Arc};

use crate::domain::{HostValue, ModuleKind};

/// Global fault callback
pub type OnErrorHandler = Arc<dyn Fn(&ErrorSignal<'_>) + Send + Sync>;
/// Error-logging function
pub type ConsoleHandler = Arc<dyn Fn(&[HostValue]) + Send + Sync>;
/// Unhandled-failure callback
pub type RejectionHandler = Arc<dyn Fn(&RejectionEvent) + Send + Sync>;

/// Arguments of one global fault callback invocation.
#[derive(Debug, Default)]
pub struct ErrorSignal<'a> {
    pub message: Option<String>,
    /// Originating location (file or URL)
    pub source: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    /// The raw error value
    pub error: Option<HostValue>,
    /// Set when the signal comes from a Rust panic
    pub panic: Option<&'a PanicHookInfo<'a>>,
}

impl<'a> ErrorSignal<'a> {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_error(mut self, error: impl Into<HostValue>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Sets the originating location.
    pub fn at(mut self, source: impl Into<String>, line: u32, column: u32) -> Self {
        self.source = Some(source.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

/// An unhandled asynchronous failure.
#[derive(Debug, Clone, Default)]
pub struct RejectionEvent {
    /// Event type name, if the host provides one
    pub kind: Option<String>,
    pub reason: Option<HostValue>,
}

impl RejectionEvent {
    pub fn new(reason: impl Into<HostValue>) -> Self {
        Self {
            kind: None,
            reason: Some(reason.into()),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// A handler occupying one of the host's slots.
#[derive(Clone)]
pub enum Handler {
    OnError(OnErrorHandler),
    Console(ConsoleHandler),
    UnhandledRejection(RejectionHandler),
}

impl Handler {
    pub fn on_error(f: impl Fn(&ErrorSignal<'_>) + Send + Sync + 'static) -> Self {
        Handler::OnError(Arc::new(f))
    }

    pub fn console(f: impl Fn(&[HostValue]) + Send + Sync + 'static) -> Self {
        Handler::Console(Arc::new(f))
    }

    pub fn unhandled_rejection(f: impl Fn(&RejectionEvent) + Send + Sync + 'static) -> Self {
        Handler::UnhandledRejection(Arc::new(f))
    }

    /// The slot this handler belongs in.
    pub fn kind(&self) -> ModuleKind {
        match self {
            Handler::OnError(_) => ModuleKind::OnError,
            Handler::Console(_) => ModuleKind::Console,
            Handler::UnhandledRejection(_) => ModuleKind::UnhandledRejection,
        }
    }

    /// Identity comparison: true only for clones of the same handler.
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        match (self, other) {
            (Handler::OnError(a), Handler::OnError(b)) => Arc::ptr_eq(a, b),
            (Handler::Console(a), Handler::Console(b)) => Arc::ptr_eq(a, b),
            (Handler::UnhandledRejection(a), Handler::UnhandledRejection(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({})", self.kind())
    }
}

/// The host's process-wide handler slots.
pub trait HostErrorSurface: Send + Sync {
    /// The handler currently installed for `kind`, if any.
    fn handler(&self, kind: ModuleKind) -> Option<Handler>;

    /// Replace the handler for `kind`; `None` empties the slot.
    fn set_handler(&self, kind: ModuleKind, handler: Option<Handler>);
}
