//! Shared test doubles for the agent integration tests
//!
//! - `RecordingTransport` keeps every (url, body) pair it is asked to send
//! - `FixedEnvironment` answers with constant location/navigator details
//! - `SequentialIds` yields `id-1`, `id-2`, ...

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use desole_agent::{Agent, SlotHost};
use desole_core::{
    ports::{HostEnvironment, IdGenerator, ReportTransport},
    Config,
};
use serde_json::Value;

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    pub fn urls(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| serde_json::from_str(body).expect("report body is JSON"))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl ReportTransport for RecordingTransport {
    fn send(&self, url: &str, body: String) {
        self.sent.lock().unwrap().push((url.to_string(), body));
    }
}

pub struct FixedEnvironment;

impl HostEnvironment for FixedEnvironment {
    fn location_href(&self) -> Option<String> {
        Some("https://shop.example/cart".to_string())
    }

    fn hostname(&self) -> Option<String> {
        Some("shop.example".to_string())
    }

    fn language(&self) -> Option<String> {
        Some("en-US".to_string())
    }

    fn platform(&self) -> Option<String> {
        Some("Linux x86_64".to_string())
    }
}

#[derive(Default)]
pub struct SequentialIds(AtomicUsize);

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        format!("id-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Build an agent over `host` with recording doubles for everything else.
pub fn agent_with(config: Config, host: Arc<SlotHost>) -> (Agent, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let agent = Agent::builder(config)
        .host(host)
        .environment(Arc::new(FixedEnvironment))
        .transport(transport.clone())
        .id_generator(Arc::new(SequentialIds::default()))
        .build();
    (agent, transport)
}
