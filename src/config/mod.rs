//! Configuration module for audiohound
//!
//! Every setting has a working default, so a configuration file is only
//! needed to override the output directory, timeouts, user agent, or the
//! archive lookup endpoint.
//!
//! # Example
//!
//! ```no_run
//! use audiohound::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Output directory: {}", config.output.directory);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
