//! Error types for the e2e harness

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the harness error
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Harness error types
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(
        "application binary not found under {dist_dir}; build the desktop bundle before running the suite",
        dist_dir = .dist_dir.display()
    )]
    AppNotBuilt { dist_dir: PathBuf },

    #[error("failed to spawn application: {0}")]
    Spawn(String),

    #[error("application control endpoint not ready after {attempts} attempts")]
    StartupTimeout { attempts: usize },

    // Scenario failures pass through unwrapped.
    #[error(transparent)]
    Driver(#[from] datascope_driver::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
