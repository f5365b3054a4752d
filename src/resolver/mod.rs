//! Resolver module for turning a URL into a downloaded audio file
//!
//! This module contains the core resolution pipeline, including:
//! - HTTP fetching and binary-vs-page classification
//! - Candidate extraction from HTML pages
//! - Serial candidate retries with Referer support
//! - The single-level archive fallback

mod extractor;
mod fetcher;
mod orchestrator;

pub use extractor::{extract_candidates, Candidate, CandidateSet};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome};
pub use orchestrator::{ResolutionRequest, Resolver};

use crate::config::Config;
use crate::persist::PersistedFile;
use crate::Result;

/// Resolves one URL into a persisted audio file
///
/// This is the main entry point for a resolution. It will:
/// 1. Fetch the target URL directly
/// 2. On an HTML response, scan the page for audio candidates
/// 3. Retry each candidate in priority order
/// 4. Fall back to an archived snapshot of the URL, at most once
///
/// # Arguments
///
/// * `config` - Resolver configuration
/// * `target_url` - The URL to resolve
///
/// # Returns
///
/// * `Ok(Some(PersistedFile))` - Audio was found and written to disk
/// * `Ok(None)` - No audio could be resolved
/// * `Err(HoundError)` - A fatal (filesystem or client setup) failure
pub async fn resolve(config: &Config, target_url: &str) -> Result<Option<PersistedFile>> {
    let resolver = Resolver::new(config)?;
    let request = ResolutionRequest::new(target_url, &config.output.directory);
    resolver.resolve(request).await
}
