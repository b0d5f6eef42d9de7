//! Desole Agent - Client-side error interception and reporting
//!
//! Provides:
//! - `Agent`: Installs and removes hooks on a host's error surface
//! - `Reporter`: Builds, filters and transmits reports
//! - `NoiseFilter`: Fixed suppression of known-benign conditions
//! - `HttpTransport`: Fire-and-forget JSON POST delivery
//! - `SlotHost`, `install_panic_bridge`, `ConsoleLayer`: A native host runtime
//!   backed by panics and `tracing` error events
//! - `ProcessEnvironment`, `UuidGenerator`: Process-level context

pub mod agent;
pub mod environment;
pub mod filter;
pub mod host;
pub mod reporter;
pub mod transport;

pub use agent::{Agent, AgentBuilder};
pub use environment::{ProcessEnvironment, UuidGenerator};
pub use filter::NoiseFilter;
pub use host::{install_panic_bridge, ConsoleLayer, SlotHost};
pub use reporter::{Reporter, TrackOutcome, STACK_FALLBACK_PREFIX};
pub use transport::HttpTransport;
