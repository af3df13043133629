#![forbid(unsafe_code)]

//! Stand-in API client, held app-wide as a resource-cache singleton.
//!
//! It performs no I/O; its only job is to be observably *one* instance:
//! the call counter keeps rising across sessions and passes, which would
//! reset if anything re-created the client.

use std::sync::atomic::{AtomicU64, Ordering};

/// A pretend service connection.
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    calls: AtomicU64,
}

impl ApiClient {
    /// "Connect" to a service.
    #[must_use]
    pub fn connect(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        tracing::info!(base_url = base_url.as_str(), "api client connected");
        Self {
            base_url,
            calls: AtomicU64::new(0),
        }
    }

    /// The address this client was connected to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Pretend request. Counts invocations so singleton reuse shows up.
    pub fn fetch_motd(&self) -> String {
        let n = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        format!("scores service ready (request #{n})")
    }

    /// Requests served so far, across every session.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}
