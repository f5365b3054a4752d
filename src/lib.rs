//! Audiohound: an audio URL resolver and downloader
//!
//! This crate turns one input URL into a persisted audio file. The URL may
//! point directly at an audio resource, or at a web page that embeds or
//! references audio elsewhere; when everything else fails, the most recent
//! Wayback Machine snapshot of the URL is tried once.

pub mod archive;
pub mod config;
pub mod media;
pub mod persist;
pub mod resolver;

use thiserror::Error;

/// Main error type for audiohound operations
///
/// Only failures that end a resolution belong here. Network and HTTP
/// errors on individual fetch attempts are absorbed into
/// [`resolver::FetchOutcome::Failed`] and never surface as a `HoundError`.
#[derive(Debug, Error)]
pub enum HoundError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Persistence error: {0}")]
    Persist(#[from] persist::PersistError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for audiohound operations
pub type Result<T> = std::result::Result<T, HoundError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use archive::{ArchiveClient, ArchiveSnapshot};
pub use config::Config;
pub use persist::{PersistError, PersistedFile};
pub use resolver::{FetchOutcome, ResolutionRequest, Resolver};
