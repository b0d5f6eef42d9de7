//! Panic bridge
//!
//! Makes Rust panics the host's global-error callback. The panic hook that
//! was installed before the bridge becomes the initial occupant of the
//! global-error slot, so an agent that forwards to the saved original keeps
//! the default panic output intact.

use std::{backtrace::Backtrace, panic::PanicHookInfo, sync::Arc};

use desole_core::{
    domain::{HostValue, ModuleKind, NativeError},
    ports::{ErrorSignal, Handler, HostErrorSurface},
};

use super::slots::SlotHost;

/// Error name used for panics in reports.
pub const PANIC_ERROR_NAME: &str = "Panic";

type PanicHook = dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static;

/// Installs a panic hook that dispatches every panic to `host`'s
/// global-error slot.
///
/// Chains with the existing panic hook: it is placed in the slot and only
/// runs when whatever occupies the slot forwards the signal to it. Pass
/// [`SlotHost::global`] to reach agents built without an explicit host.
pub fn install_panic_bridge(host: Arc<SlotHost>) {
    let previous_hook: Arc<PanicHook> = Arc::from(std::panic::take_hook());

    host.set_handler(
        ModuleKind::OnError,
        Some(Handler::on_error(move |signal| {
            if let Some(info) = signal.panic {
                previous_hook(info);
            }
        })),
    );

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = panic_message(panic_info);
        let location = panic_info.location();
        let backtrace = Backtrace::force_capture().to_string();

        let stack = match location {
            Some(l) => format!(
                "panicked at {}:{}:{}: {message}\n{backtrace}",
                l.file(),
                l.line(),
                l.column()
            ),
            None => format!("panicked: {message}\n{backtrace}"),
        };

        let signal = ErrorSignal {
            message: Some(message.clone()),
            source: location.map(|l| l.file().to_string()),
            line: location.map(|l| l.line()),
            column: location.map(|l| l.column()),
            error: Some(HostValue::Error(
                NativeError::new(PANIC_ERROR_NAME, message).with_stack(stack),
            )),
            panic: Some(panic_info),
        };

        host.raise_error(&signal);
    }));
}

/// Extract the panic payload as text.
pub fn panic_message(panic_info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
