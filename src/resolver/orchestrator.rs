//! Resolution orchestration
//!
//! Drives the end-to-end state machine for one request:
//!
//! direct fetch → (binary: done) | (HTML: scan page → try candidates)
//! → archive fallback → retry once against the snapshot
//!
//! Every recoverable failure moves to the next stage; only filesystem
//! errors end the resolution early.

use crate::archive::ArchiveClient;
use crate::config::Config;
use crate::persist::PersistedFile;
use crate::resolver::extractor::extract_candidates;
use crate::resolver::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::Result;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// One resolution attempt's immutable inputs
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    /// The URL to resolve
    pub target_url: String,

    /// Directory downloaded audio is written into
    pub output_dir: PathBuf,

    /// Referer header for the initial fetch, if any
    pub referer: Option<String>,

    /// Whether an archived snapshot may still be tried
    pub archive_fallback_allowed: bool,
}

impl ResolutionRequest {
    /// Creates a request with the archive fallback available
    pub fn new(target_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        ResolutionRequest {
            target_url: target_url.into(),
            output_dir: output_dir.into(),
            referer: None,
            archive_fallback_allowed: true,
        }
    }

    /// The follow-up request against an archived snapshot
    ///
    /// Clears `archive_fallback_allowed`, which caps the fallback chain at
    /// depth one: an archived page that fails to yield audio cannot trigger
    /// another lookup.
    fn archived_retry(&self, snapshot_url: String) -> Self {
        ResolutionRequest {
            target_url: snapshot_url,
            output_dir: self.output_dir.clone(),
            referer: None,
            archive_fallback_allowed: false,
        }
    }
}

/// Drives resolution requests through the pipeline
pub struct Resolver {
    client: Client,
    archive: ArchiveClient,
}

impl Resolver {
    /// Creates a resolver from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Resolver configuration (timeouts, user agent, archive
    ///   endpoint)
    ///
    /// # Returns
    ///
    /// * `Ok(Resolver)` - Ready to resolve requests
    /// * `Err(HoundError)` - Failed to build the HTTP client
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(
            &config.http.user_agent,
            Duration::from_secs(config.http.fetch_timeout_secs),
        )?;

        let archive = ArchiveClient::new(
            client.clone(),
            config.http.archive_endpoint.clone(),
            Duration::from_secs(config.http.archive_timeout_secs),
        );

        Ok(Resolver { client, archive })
    }

    /// Resolves a request into a persisted audio file
    ///
    /// Runs the pipeline against the target URL and, when that yields
    /// nothing and the fallback is still allowed, once more against the
    /// most recent archived snapshot. The loop runs at most twice.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(PersistedFile))` - Audio found and written
    /// * `Ok(None)` - Every stage exhausted without audio
    /// * `Err(HoundError)` - Fatal filesystem failure
    pub async fn resolve(&self, request: ResolutionRequest) -> Result<Option<PersistedFile>> {
        tokio::fs::create_dir_all(&request.output_dir).await?;

        let mut request = request;
        loop {
            if let Some(file) = self.resolve_once(&request).await? {
                return Ok(Some(file));
            }

            if !request.archive_fallback_allowed {
                return Ok(None);
            }

            match self.archive.lookup_snapshot(&request.target_url).await {
                Some(snapshot) => request = request.archived_retry(snapshot.snapshot_url),
                None => return Ok(None),
            }
        }
    }

    /// One pass of direct fetch, page scan, and candidate retries
    async fn resolve_once(&self, request: &ResolutionRequest) -> Result<Option<PersistedFile>> {
        let outcome = fetch_url(
            &self.client,
            &request.target_url,
            request.referer.as_deref(),
            &request.output_dir,
        )
        .await?;

        let (content, final_url) = match outcome {
            FetchOutcome::Downloaded(file) => return Ok(Some(file)),
            FetchOutcome::HtmlPage { content, final_url } => (content, final_url),
            FetchOutcome::Failed { reason } => {
                tracing::warn!("Direct fetch failed: {}", reason);
                return Ok(None);
            }
        };

        tracing::info!("URL is a webpage. Scanning for audio...");
        let candidates = extract_candidates(&content, &final_url);

        if candidates.is_empty() {
            tracing::info!("No audio links found in page content");
            return Ok(None);
        }

        tracing::info!("Found {} candidate audio link(s)", candidates.len());

        // Some hosts gate audio behind a Referer check; send the page we
        // actually landed on.
        let referer = final_url.to_string();

        for candidate in candidates.iter() {
            tracing::info!("Trying candidate: {}", candidate.absolute_url);
            match fetch_url(
                &self.client,
                &candidate.absolute_url,
                Some(&referer),
                &request.output_dir,
            )
            .await?
            {
                FetchOutcome::Downloaded(file) => return Ok(Some(file)),
                FetchOutcome::HtmlPage { .. } => {
                    tracing::debug!("Candidate resolved to another page, skipping");
                }
                FetchOutcome::Failed { reason } => {
                    tracing::debug!("Candidate failed: {}", reason);
                }
            }
        }

        Ok(None)
    }
}
