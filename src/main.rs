//! Audiohound main entry point
//!
//! This is the command-line interface for the audiohound resolver.

use anyhow::Context;
use audiohound::config::{load_config, Config};
use audiohound::resolver::resolve;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Audiohound: an audio URL resolver and downloader
///
/// Audiohound takes one URL, which may point directly at an audio file or
/// at a page that embeds one, and downloads the audio it resolves to. If
/// the live URL yields nothing, the most recent Wayback Machine snapshot
/// is tried once.
#[derive(Parser, Debug)]
#[command(name = "audiohound")]
#[command(version = "1.0.0")]
#[command(about = "Resolve a web URL into a downloaded audio file", long_about = None)]
struct Cli {
    /// The URL to resolve
    #[arg(value_name = "URL")]
    url: String,

    /// Directory downloaded files are written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, or fall back to the defaults
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(dir) = cli.output_dir {
        config.output.directory = dir;
    }

    match resolve(&config, &cli.url).await? {
        Some(file) => {
            println!("✓ Saved: {} ({} bytes)", file.path.display(), file.size_bytes);
            Ok(())
        }
        None => {
            println!("No audio could be resolved from: {}", cli.url);
            std::process::exit(1);
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("audiohound=info,warn"),
            1 => EnvFilter::new("audiohound=debug,info"),
            2 => EnvFilter::new("audiohound=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
