//! Wayback Machine snapshot lookup
//!
//! This module queries the archive availability endpoint for the most
//! recent archived copy of a URL. Lookup failures of any kind (network
//! error, non-JSON body, missing fields) are reported as "no snapshot";
//! nothing here can fail a resolution.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// An archived copy of a URL found via the availability endpoint
#[derive(Debug, Clone)]
pub struct ArchiveSnapshot {
    /// URL of the archived copy
    pub snapshot_url: String,
}

/// Response shape of the availability endpoint
///
/// `{ "archived_snapshots": { "closest": { "url": "<string>" } } }` —
/// every level may be absent, and absence means "no snapshot".
#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    archived_snapshots: Option<ArchivedSnapshots>,
}

#[derive(Debug, Deserialize)]
struct ArchivedSnapshots {
    closest: Option<ClosestSnapshot>,
}

#[derive(Debug, Deserialize)]
struct ClosestSnapshot {
    url: Option<String>,
}

/// Client for the archive availability endpoint
pub struct ArchiveClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl ArchiveClient {
    /// Creates an archive client against the given availability endpoint
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `endpoint` - Availability endpoint base URL, without query string
    /// * `timeout` - Per-lookup timeout
    pub fn new(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        ArchiveClient {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Looks up the most recent archived snapshot of a URL
    ///
    /// Issues one GET to `<endpoint>?url=<url>`. Returns `None` on any
    /// failure; a missing snapshot is a normal outcome, not an error.
    pub async fn lookup_snapshot(&self, url: &str) -> Option<ArchiveSnapshot> {
        tracing::info!("Checking archive for: {}", url);
        let request_url = format!("{}?url={}", self.endpoint, url);

        let response = match self
            .client
            .get(&request_url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Archive lookup failed: {}", e);
                return None;
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Archive lookup failed reading body: {}", e);
                return None;
            }
        };

        match snapshot_url_from_body(&body) {
            Some(snapshot_url) => {
                tracing::info!("Found archived version: {}", snapshot_url);
                Some(ArchiveSnapshot { snapshot_url })
            }
            None => {
                tracing::info!("No archived version found");
                None
            }
        }
    }
}

/// Extracts `archived_snapshots.closest.url` from a response body
fn snapshot_url_from_body(body: &str) -> Option<String> {
    let parsed: AvailabilityResponse = serde_json::from_str(body).ok()?;
    parsed.archived_snapshots?.closest?.url
}
