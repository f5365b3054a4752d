//! Persistence module for writing downloaded audio to disk
//!
//! This module handles everything between a confirmed-binary HTTP response
//! and a file on disk:
//! - Filename derivation from response headers and the final URL
//! - Sanitization of characters that are unsafe in path segments
//! - Collision-free file creation within the output directory
//! - Incremental streaming of the response body with progress reporting

mod filename;

pub use filename::{derive_filename, sanitize_filename};

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Response;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Persistence-specific errors
///
/// `Create` and `Write` are filesystem failures and fatal to a resolution;
/// `Body` is a network failure while streaming and is treated like any
/// other failed fetch attempt by the caller.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Connection lost while reading response body: {0}")]
    Body(#[from] reqwest::Error),
}

/// A file successfully written to the output directory
#[derive(Debug, Clone)]
pub struct PersistedFile {
    /// Final path of the written file
    pub path: PathBuf,

    /// Number of bytes written
    pub size_bytes: u64,
}

/// Streams a binary HTTP response into the output directory
///
/// The filename is derived from the Content-Disposition header, the final
/// URL, or a synthesized fallback, in that order (see [`derive_filename`]),
/// then made unique within the directory. Content is written chunk by
/// chunk as it arrives; when the response declares a Content-Length,
/// progress is logged as completed/total bytes.
///
/// On failure the partially written file is left on disk; the handle
/// itself is closed on every exit path.
///
/// # Arguments
///
/// * `response` - A 2xx response already classified as binary
/// * `output_dir` - Directory to write into (must already exist)
///
/// # Returns
///
/// * `Ok(PersistedFile)` - Path and size of the written file
/// * `Err(PersistError)` - Filesystem or mid-stream network failure
pub async fn persist_response(
    mut response: Response,
    output_dir: &Path,
) -> Result<PersistedFile, PersistError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    let content_disposition = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let filename = derive_filename(
        content_disposition.as_deref(),
        response.url(),
        &content_type,
    );

    let (mut file, path) = create_unique(output_dir, &filename).await?;
    tracing::info!("Saving to: {}", path.display());

    let total_size = response.content_length().unwrap_or(0);
    let mut written: u64 = 0;

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                file.write_all(&chunk)
                    .await
                    .map_err(|e| PersistError::Write {
                        path: path.clone(),
                        source: e,
                    })?;
                written += chunk.len() as u64;

                if total_size > 0 {
                    tracing::trace!(
                        "Progress: {:.1}% ({}/{} bytes)",
                        written as f64 * 100.0 / total_size as f64,
                        written,
                        total_size
                    );
                }
            }
            Ok(None) => break,
            Err(e) => return Err(PersistError::Body(e)),
        }
    }

    file.flush().await.map_err(|e| PersistError::Write {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!("Success! {} bytes written", written);

    Ok(PersistedFile {
        path,
        size_bytes: written,
    })
}

/// Creates a file under `dir` with a name based on `filename`, appending
/// `_1`, `_2`, ... before the extension until creation succeeds
///
/// Uses exclusive creation, so two runs racing on the same directory get
/// distinct suffixes instead of overwriting each other.
async fn create_unique(dir: &Path, filename: &str) -> Result<(File, PathBuf), PersistError> {
    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (filename, None),
    };

    let mut counter: u32 = 0;
    loop {
        let candidate = if counter == 0 {
            filename.to_string()
        } else {
            match extension {
                Some(ext) => format!("{}_{}.{}", stem, counter, ext),
                None => format!("{}_{}", stem, counter),
            }
        };

        let path = dir.join(candidate);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => counter += 1,
            Err(e) => return Err(PersistError::Create { path, source: e }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_unique_no_collision() {
        let dir = tempfile::tempdir().unwrap();
        let (_file, path) = create_unique(dir.path(), "clip.mp3").await.unwrap();
        assert_eq!(path, dir.path().join("clip.mp3"));
    }

    #[tokio::test]
    async fn test_create_unique_appends_suffix_before_extension() {
        let dir = tempfile::tempdir().unwrap();
        let (_f1, p1) = create_unique(dir.path(), "clip.mp3").await.unwrap();
        let (_f2, p2) = create_unique(dir.path(), "clip.mp3").await.unwrap();
        let (_f3, p3) = create_unique(dir.path(), "clip.mp3").await.unwrap();

        assert_eq!(p1, dir.path().join("clip.mp3"));
        assert_eq!(p2, dir.path().join("clip_1.mp3"));
        assert_eq!(p3, dir.path().join("clip_2.mp3"));
    }

    #[tokio::test]
    async fn test_create_unique_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let (_f1, p1) = create_unique(dir.path(), "track").await.unwrap();
        let (_f2, p2) = create_unique(dir.path(), "track").await.unwrap();

        assert_eq!(p1, dir.path().join("track"));
        assert_eq!(p2, dir.path().join("track_1"));
    }

    #[tokio::test]
    async fn test_create_unique_unwritable_directory() {
        let result = create_unique(Path::new("/nonexistent/dir"), "clip.mp3").await;
        assert!(matches!(result, Err(PersistError::Create { .. })));
    }
}
