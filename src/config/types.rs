use serde::Deserialize;

/// Browser-like user agent sent with every request
///
/// Some hosts serve error pages or redirects to unidentified clients, so
/// the default impersonates a desktop browser rather than naming the tool.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default endpoint of the Wayback Machine availability API
pub const DEFAULT_ARCHIVE_ENDPOINT: &str = "http://archive.org/wayback/available";

/// Main configuration structure for audiohound
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output: OutputConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory downloaded files are written to
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: default_directory(),
        }
    }
}

/// HTTP behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Timeout for resource and page fetches, in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Timeout for archive availability lookups, in seconds
    #[serde(rename = "archive-timeout-secs", default = "default_archive_timeout")]
    pub archive_timeout_secs: u64,

    /// User-Agent header value sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the archive availability endpoint
    #[serde(rename = "archive-endpoint", default = "default_archive_endpoint")]
    pub archive_endpoint: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            fetch_timeout_secs: default_fetch_timeout(),
            archive_timeout_secs: default_archive_timeout(),
            user_agent: default_user_agent(),
            archive_endpoint: default_archive_endpoint(),
        }
    }
}

fn default_directory() -> String {
    "downloads".to_string()
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_archive_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_archive_endpoint() -> String {
    DEFAULT_ARCHIVE_ENDPOINT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.directory, "downloads");
        assert_eq!(config.http.fetch_timeout_secs, 15);
        assert_eq!(config.http.archive_timeout_secs, 10);
        assert_eq!(config.http.archive_endpoint, DEFAULT_ARCHIVE_ENDPOINT);
        assert!(config.http.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.output.directory, "downloads");
        assert_eq!(config.http.fetch_timeout_secs, 15);
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str(
            r#"
[http]
fetch-timeout-secs = 30
"#,
        )
        .unwrap();
        assert_eq!(config.http.fetch_timeout_secs, 30);
        assert_eq!(config.http.archive_timeout_secs, 10);
        assert_eq!(config.output.directory, "downloads");
    }
}
