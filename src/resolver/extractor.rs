//! Candidate extraction from HTML pages
//!
//! Five independent strategies contribute to one working list:
//! 1. `<audio>` elements (own `src`, then nested `<source>` elements)
//! 2. `<a>` elements whose href ends in a recognized audio extension
//! 3. `<source>` elements whose src ends in a recognized audio extension
//! 4. Open Graph / Twitter audio meta tags
//! 5. A regex scan of the raw markup for absolute `.mp3` URLs, which
//!    catches links inside inline scripts and serialized data that the
//!    tree parse does not expose as attributes
//!
//! Malformed markup never fails extraction; scraper's best-effort tree is
//! walked and a strategy that finds nothing contributes nothing.

use crate::media;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Meta tag `property` keys whose content is an audio URL
const AUDIO_META_PROPERTIES: &[&str] = &["og:audio", "og:audio:url", "og:audio:secure_url"];

/// Meta tag `name` keys whose content is an audio URL
const AUDIO_META_NAMES: &[&str] = &["twitter:player:stream", "twitter:audio:partner"];

/// Absolute mp3 URLs embedded anywhere in the raw markup
///
/// Deliberately mp3-only, unlike the structural strategies which use the
/// full extension allowlist.
const RAW_MP3_PATTERN: &str = r#"https?://[^\s"\\]+\.mp3"#;

/// A URL discovered by some extraction strategy, prior to being fetched
///
/// Candidates are identified by their exact URL string; deduplication
/// happens on that string alone.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The candidate URL, resolved against the page's base URL
    pub absolute_url: String,

    /// Position in the deduplicated discovery sequence
    pub discovery_order: usize,
}

/// Deduplicated, priority-ordered sequence of candidates
///
/// No two elements share a URL, and every `.mp3` candidate precedes every
/// non-mp3 candidate; within each group discovery order is preserved.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Builds a set from a raw working list of absolute URLs
    ///
    /// Duplicates are removed (first occurrence wins, order preserved),
    /// then the list is stably partitioned so mp3 URLs come first. The
    /// partition is two passes over the deduplicated list, not a sort.
    pub fn from_discovered(urls: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut unique = Vec::new();
        for url in urls {
            if seen.insert(url.clone()) {
                unique.push(Candidate {
                    discovery_order: unique.len(),
                    absolute_url: url,
                });
            }
        }

        let (mp3s, others): (Vec<Candidate>, Vec<Candidate>) = unique
            .into_iter()
            .partition(|c| media::is_mp3_url(&c.absolute_url));

        let mut candidates = mp3s;
        candidates.extend(others);
        CandidateSet { candidates }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Extracts plausible audio URLs from an HTML page
///
/// # Arguments
///
/// * `html` - The page content
/// * `base_url` - The page's final URL, for resolving relative links
///
/// # Returns
///
/// A deduplicated, mp3-first ordered [`CandidateSet`]; empty when the
/// page contains no recognizable audio references.
pub fn extract_candidates(html: &str, base_url: &Url) -> CandidateSet {
    let document = Html::parse_document(html);
    let mut discovered: Vec<String> = Vec::new();

    collect_audio_elements(&document, base_url, &mut discovered);
    collect_audio_anchors(&document, base_url, &mut discovered);
    collect_audio_sources(&document, base_url, &mut discovered);
    collect_meta_tags(&document, base_url, &mut discovered);
    collect_raw_mp3_urls(html, base_url, &mut discovered);

    CandidateSet::from_discovered(discovered)
}

/// Strategy 1: `<audio>` elements, own src then nested `<source>` elements
///
/// No extension filter here; anything an audio element points at is a
/// candidate.
fn collect_audio_elements(document: &Html, base_url: &Url, discovered: &mut Vec<String>) {
    let audio_selector = match Selector::parse("audio") {
        Ok(selector) => selector,
        Err(_) => return,
    };
    let source_selector = match Selector::parse("source[src]") {
        Ok(selector) => selector,
        Err(_) => return,
    };

    for audio in document.select(&audio_selector) {
        if let Some(src) = audio.value().attr("src") {
            push_resolved(discovered, src, base_url);
        }
        for source in audio.select(&source_selector) {
            if let Some(src) = source.value().attr("src") {
                push_resolved(discovered, src, base_url);
            }
        }
    }
}

/// Strategy 2: anchors whose target ends in a recognized audio extension
fn collect_audio_anchors(document: &Html, base_url: &Url, discovered: &mut Vec<String>) {
    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if media::has_audio_extension(href) {
                    push_resolved(discovered, href, base_url);
                }
            }
        }
    }
}

/// Strategy 3: any `<source>` element with an audio-extension src
///
/// Sources already collected under strategy 1 fall to deduplication.
fn collect_audio_sources(document: &Html, base_url: &Url, discovered: &mut Vec<String>) {
    if let Ok(selector) = Selector::parse("source[src]") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                if media::has_audio_extension(src) {
                    push_resolved(discovered, src, base_url);
                }
            }
        }
    }
}

/// Strategy 4: Open Graph / Twitter audio meta tags
fn collect_meta_tags(document: &Html, base_url: &Url, discovered: &mut Vec<String>) {
    if let Ok(selector) = Selector::parse("meta") {
        for element in document.select(&selector) {
            let property = element.value().attr("property");
            let name = element.value().attr("name");

            let matches = property.is_some_and(|p| AUDIO_META_PROPERTIES.contains(&p))
                || name.is_some_and(|n| AUDIO_META_NAMES.contains(&n));

            if matches {
                if let Some(content) = element.value().attr("content") {
                    push_resolved(discovered, content, base_url);
                }
            }
        }
    }
}

/// Strategy 5: regex scan of the raw markup for absolute mp3 URLs
fn collect_raw_mp3_urls(html: &str, base_url: &Url, discovered: &mut Vec<String>) {
    if let Ok(pattern) = Regex::new(RAW_MP3_PATTERN) {
        for found in pattern.find_iter(html) {
            push_resolved(discovered, found.as_str(), base_url);
        }
    }
}

/// Resolves a candidate value against the base URL and appends it
///
/// Empty and unresolvable values are skipped.
fn push_resolved(discovered: &mut Vec<String>, value: &str, base_url: &Url) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    if let Ok(resolved) = base_url.join(value) {
        discovered.push(resolved.to_string());
    }
}
