//! Report transport port
//!
//! Delivery is fire-and-forget: `send` must return without waiting for the
//! endpoint, and failures are never surfaced to the caller.

/// Sends serialized reports to a collection endpoint.
pub trait ReportTransport: Send + Sync {
    /// Issue one POST of `body` (a JSON document) to `url`.
    fn send(&self, url: &str, body: String);
}
