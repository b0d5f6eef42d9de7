//! Port definitions
//!
//! Traits that describe the host runtime the agent hooks into. The agent
//! depends only on these; concrete adapters live in `desole-agent`.
//!
//! ## Ports Overview
//!
//! - [`HostErrorSurface`] - The three process-wide handler slots
//! - [`HostEnvironment`] - Location and navigator-like details
//! - [`IdGenerator`] - Unique endpoint identifiers
//! - [`ReportTransport`] - Fire-and-forget report delivery

pub mod environment;
pub mod host_surface;
pub mod transport;

pub use environment::{HostEnvironment, IdGenerator};
pub use host_surface::{
    ConsoleHandler, ErrorSignal, Handler, HostErrorSurface, OnErrorHandler, RejectionEvent,
    RejectionHandler,
};
pub use transport::ReportTransport;
