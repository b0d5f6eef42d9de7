//! HTTP report transport
//!
//! POSTs each report as JSON and returns immediately. There is no response
//! handling, no retry and no timeout: a slow or unreachable endpoint only
//! leaves a background request pending.
//!
//! The request runs on the caller's tokio runtime when there is one (or on
//! the runtime given to [`HttpTransport::with_runtime`]). Outside a runtime
//! it runs on a short-lived background thread.

use desole_core::ports::ReportTransport;
use reqwest::{header::CONTENT_TYPE, Client};
use tokio::runtime::Handle;
use tracing::debug;

/// Fire-and-forget JSON POST transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    runtime: Option<Handle>,
}

impl HttpTransport {
    /// Creates a transport with a default `reqwest` client.
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Creates a transport around a preconfigured client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            runtime: None,
        }
    }

    /// Spawns requests on `handle` instead of the caller's runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportTransport for HttpTransport {
    fn send(&self, url: &str, body: String) {
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let target = url.to_string();

        let delivery = async move {
            match request.send().await {
                Ok(response) => {
                    debug!(url = %target, status = %response.status(), "Report delivered")
                }
                Err(e) => debug!(url = %target, error = %e, "Report delivery failed"),
            }
        };

        if let Some(handle) = self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            handle.spawn(delivery);
            return;
        }

        let spawned = std::thread::Builder::new()
            .name("desole-send".to_string())
            .spawn(move || {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(delivery),
                    Err(e) => debug!(error = %e, "Failed to start delivery runtime"),
                }
            });

        if let Err(e) = spawned {
            debug!(error = %e, "Failed to spawn delivery thread");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_outside_runtime_does_not_block() {
        let transport = HttpTransport::new();
        let started = std::time::Instant::now();

        // Nothing listens on the discard port; the failure stays in the background.
        transport.send("http://127.0.0.1:9/e", "{}".to_string());

        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_send_with_malformed_url_is_silent() {
        let transport = HttpTransport::new();
        transport.send("", "{}".to_string());
        transport.send("not a url", "{}".to_string());
    }
}
