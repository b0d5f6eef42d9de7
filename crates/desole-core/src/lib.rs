//! Desole Core - Domain types and ports for client-side error telemetry
//!
//! This crate contains:
//! - **Configuration** - `Config`, loaded from YAML or built in code
//! - **Domain types** - `CaptureEvent`, `Report`, `HostValue`, `CapturedFault`
//! - **Port definitions** - Traits the agent depends on: `HostErrorSurface`,
//!   `HostEnvironment`, `IdGenerator`, `ReportTransport`
//!
//! # Architecture
//!
//! The domain module holds pure data and normalization rules with no I/O.
//! Ports describe the host runtime the agent hooks into; the adapters that
//! implement them live in `desole-agent`.

pub mod config;
pub mod domain;
pub mod ports;

pub use config::{Config, ValidationError};
pub use domain::{
    AppIdentity, CaptureEvent, CapturedFault, DesoleError, EndpointInfo, EndpointOverride,
    HostObject, HostValue, ModuleKind, NativeError, Report, Severity,
};
pub use ports::{
    ConsoleHandler, ErrorSignal, Handler, HostEnvironment, HostErrorSurface, IdGenerator,
    OnErrorHandler, RejectionEvent, RejectionHandler, ReportTransport,
};
