//! HTTP fetcher for the resolution pipeline
//!
//! One fetch attempt is one GET. The response is classified as either a
//! binary resource (streamed straight to disk) or an HTML page (returned
//! for candidate extraction). Network and HTTP-status failures are
//! absorbed into [`FetchOutcome::Failed`]; only filesystem failures
//! during persistence propagate as errors.

use crate::media;
use crate::persist::{self, PersistError, PersistedFile};
use crate::{HoundError, Result};
use reqwest::header::{CONTENT_TYPE, REFERER};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Result of a single fetch attempt
#[derive(Debug)]
pub enum FetchOutcome {
    /// The URL was a binary resource and has been written to disk
    Downloaded(PersistedFile),

    /// The URL served an HTML page instead of audio
    HtmlPage {
        /// Page body as text
        content: String,
        /// Final URL after redirects, the base for link resolution
        final_url: Url,
    },

    /// The attempt failed (network error, HTTP error, dropped stream)
    Failed {
        /// Error description
        reason: String,
    },
}

/// Builds the HTTP client shared by all fetch attempts
///
/// The client follows redirects, identifies itself with a browser-like
/// user agent, and applies one timeout to every request.
///
/// # Arguments
///
/// * `user_agent` - User-Agent header value
/// * `timeout` - Request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    user_agent: &str,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the response
///
/// # Classification
///
/// A response whose content-type contains `text/html` is an HTML page,
/// unless the request URL itself ends in a recognized audio extension (a
/// host mislabeling audio does not demote a direct audio link). Anything
/// else is binary: non-2xx fails the attempt, 2xx is streamed to the
/// persistence writer.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The URL to fetch
/// * `referer` - Optional Referer header value, sent on candidate retries
/// * `output_dir` - Directory binary content is written into
///
/// # Returns
///
/// * `Ok(FetchOutcome)` - The attempt's outcome, including failures
/// * `Err(HoundError)` - A fatal filesystem failure during persistence
pub async fn fetch_url(
    client: &Client,
    url: &str,
    referer: Option<&str>,
    output_dir: &Path,
) -> Result<FetchOutcome> {
    tracing::info!("Attempting download: {}", url);

    let mut request = client.get(url);
    if let Some(referer) = referer {
        request = request.header(REFERER, referer);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            return Ok(FetchOutcome::Failed {
                reason: describe_request_error(&e),
            })
        }
    };

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    if content_type.contains("text/html") && !media::has_audio_extension(url) {
        let final_url = response.url().clone();
        return match response.text().await {
            Ok(content) => Ok(FetchOutcome::HtmlPage { content, final_url }),
            Err(e) => Ok(FetchOutcome::Failed {
                reason: format!("Failed to read page body: {}", e),
            }),
        };
    }

    let status = response.status();
    if !status.is_success() {
        return Ok(FetchOutcome::Failed {
            reason: format!("HTTP {}", status),
        });
    }

    match persist::persist_response(response, output_dir).await {
        Ok(file) => Ok(FetchOutcome::Downloaded(file)),
        // A dropped connection mid-stream fails this attempt, not the resolution
        Err(PersistError::Body(e)) => Ok(FetchOutcome::Failed {
            reason: format!("Connection lost while downloading: {}", e),
        }),
        Err(e) => Err(HoundError::Persist(e)),
    }
}

/// Describes a request error for the attempt's failure reason
fn describe_request_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_USER_AGENT;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(DEFAULT_USER_AGENT, Duration::from_secs(15));
        assert!(client.is_ok());
    }

    // Fetch classification and outcome handling are exercised end-to-end
    // with wiremock in tests/resolution_tests.rs
}
