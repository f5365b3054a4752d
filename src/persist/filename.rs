//! Filename derivation for downloaded files
//!
//! Derivation order (first rule producing a non-empty name containing a
//! dot wins):
//! 1. The Content-Disposition header's `filename=` parameter
//! 2. The last path segment of the final URL, percent-decoded
//! 3. `downloaded_audio` plus an extension guessed from the content type
//!
//! The chosen name is then stripped of characters that are unsafe in a
//! path segment.

use crate::media;
use url::Url;

/// Characters removed from derived filenames
const FORBIDDEN_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Derives the output filename for a binary response
///
/// # Arguments
///
/// * `content_disposition` - Raw Content-Disposition header value, if any
/// * `final_url` - The response URL after redirects
/// * `content_type` - Lowercased Content-Type header value
pub fn derive_filename(
    content_disposition: Option<&str>,
    final_url: &Url,
    content_type: &str,
) -> String {
    let chosen = content_disposition
        .and_then(filename_from_content_disposition)
        .filter(|name| name.contains('.'))
        .or_else(|| filename_from_url(final_url).filter(|name| name.contains('.')))
        .unwrap_or_else(|| {
            format!(
                "downloaded_audio.{}",
                media::extension_for_content_type(content_type)
            )
        });

    sanitize_filename(&chosen)
}

/// Extracts the filename parameter from a Content-Disposition header value
///
/// Takes everything after `filename=` and strips surrounding quotes, which
/// is deliberately lenient about the parameter grammar.
fn filename_from_content_disposition(header: &str) -> Option<String> {
    let start = header.find("filename=")? + "filename=".len();
    let value = header[start..].trim().trim_matches('"').trim_matches('\'');

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Extracts the last path segment of a URL, percent-decoded
fn filename_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.last()?;
    if segment.is_empty() {
        return None;
    }

    let decoded = urlencoding::decode(segment)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

/// Removes characters that are unsafe in a path segment
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_content_disposition_wins() {
        let name = derive_filename(
            Some(r#"attachment; filename="episode.mp3""#),
            &url("https://example.com/stream/4412"),
            "audio/mpeg",
        );
        assert_eq!(name, "episode.mp3");
    }

    #[test]
    fn test_content_disposition_single_quotes() {
        let name = derive_filename(
            Some("attachment; filename='clip.wav'"),
            &url("https://example.com/x"),
            "audio/wav",
        );
        assert_eq!(name, "clip.wav");
    }

    #[test]
    fn test_undotted_content_disposition_falls_through_to_url() {
        let name = derive_filename(
            Some("attachment; filename=trackdata"),
            &url("https://example.com/audio/take2.ogg"),
            "audio/ogg",
        );
        assert_eq!(name, "take2.ogg");
    }

    #[test]
    fn test_url_segment_used_without_header() {
        let name = derive_filename(None, &url("https://example.com/music/song.mp3"), "audio/mpeg");
        assert_eq!(name, "song.mp3");
    }

    #[test]
    fn test_url_segment_percent_decoded() {
        let name = derive_filename(
            None,
            &url("https://example.com/my%20song.mp3"),
            "audio/mpeg",
        );
        assert_eq!(name, "my song.mp3");
    }

    #[test]
    fn test_synthesized_name_when_nothing_usable() {
        let name = derive_filename(None, &url("https://example.com/stream/play"), "audio/mpeg");
        assert_eq!(name, "downloaded_audio.mp3");
    }

    #[test]
    fn test_synthesized_name_guesses_wav() {
        let name = derive_filename(None, &url("https://example.com/play"), "audio/x-wav");
        assert_eq!(name, "downloaded_audio.wav");
    }

    #[test]
    fn test_synthesized_name_guesses_ogg() {
        let name = derive_filename(None, &url("https://example.com/play"), "audio/ogg");
        assert_eq!(name, "downloaded_audio.ogg");
    }

    #[test]
    fn test_sanitize_removes_path_separators_and_colons() {
        assert_eq!(sanitize_filename("a/b\\c:d.mp3"), "abcd.mp3");
    }

    #[test]
    fn test_sanitize_removes_all_forbidden_characters() {
        assert_eq!(sanitize_filename(r#"a\b/c*d?e:f"g<h>i|j.mp3"#), "abcdefghij.mp3");
    }

    #[test]
    fn test_sanitized_content_disposition_name() {
        let name = derive_filename(
            Some(r#"attachment; filename="mix: vol/1.mp3""#),
            &url("https://example.com/x"),
            "audio/mpeg",
        );
        assert_eq!(name, "mix vol1.mp3");
    }

    #[test]
    fn test_empty_path_synthesizes() {
        let name = derive_filename(None, &url("https://example.com/"), "audio/mpeg");
        assert_eq!(name, "downloaded_audio.mp3");
    }
}
