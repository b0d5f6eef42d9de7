//! Domain types
//!
//! Values flowing through the interception pipeline, from what the host
//! hands over (`HostValue`) to what goes on the wire (`Report`).

pub mod errors;
pub mod event;
pub mod module;
pub mod report;
pub mod value;

pub use errors::DesoleError;
pub use event::{CaptureEvent, EndpointOverride};
pub use module::{ModuleKind, Severity};
pub use report::{AppIdentity, EndpointInfo, Report};
pub use value::{CapturedFault, HostObject, HostValue, NativeError};
