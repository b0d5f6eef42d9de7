//! Integration test: `tracing` error events reach an attached agent once
//!
//! The agent logs through `tracing` while it reports, so this checks that
//! an error event routed through `ConsoleLayer` produces a single report and
//! a single call to the original logging function.

mod common;

use std::sync::{Arc, Mutex};

use common::agent_with;
use desole_agent::{ConsoleLayer, SlotHost};
use desole_core::{
    domain::{HostValue, ModuleKind},
    ports::{Handler, HostErrorSurface},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, Registry};

#[test]
fn test_error_event_is_reported_once() {
    let host = Arc::new(SlotHost::new());
    let forwarded = Arc::new(Mutex::new(Vec::new()));
    let seen = forwarded.clone();
    host.set_handler(
        ModuleKind::Console,
        Some(Handler::console(move |args| {
            let line: Vec<String> = args.iter().map(HostValue::stringify).collect();
            seen.lock().unwrap().push(line.join(" "));
        })),
    );

    let (_agent, transport) = agent_with(Config::new("https://collect.example/e"), host.clone());

    let subscriber = Registry::default().with(ConsoleLayer::new(host));
    tracing::subscriber::with_default(subscriber, || {
        tracing::error!(code = 7, "db down");
        tracing::warn!("not forwarded");
    });

    let bodies = transport.bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["type"], "ConsoleError");
    assert_eq!(bodies[0]["severity"], "info");
    assert_eq!(bodies[0]["message"], "db down");
    assert!(bodies[0]["stack"].as_str().unwrap().contains(r#"{"code":7}"#));

    assert_eq!(
        forwarded.lock().unwrap().as_slice(),
        [r#"db down {"code":7}"#.to_string()]
    );
}
