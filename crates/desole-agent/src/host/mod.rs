//! Native host runtime adapters
//!
//! - [`SlotHost`]: in-process handler slots implementing `HostErrorSurface`
//! - [`install_panic_bridge`]: routes Rust panics into the global-error slot
//! - [`ConsoleLayer`]: routes `tracing` error events into the console slot

pub mod panic;
pub mod slots;
pub mod tracing_layer;

pub use panic::install_panic_bridge;
pub use slots::SlotHost;
pub use tracing_layer::ConsoleLayer;
