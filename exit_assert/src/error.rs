use std::path::PathBuf;

/// Errors raised while acquiring the termination override.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error(
        "Another exit guard is already active (checks that intercept process exit must not overlap)"
    )]
    AlreadyActive,

    #[error("An exit guard is already held by this thread or its running candidate")]
    Reentrant,
}

/// Errors raised while loading matcher configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path:?}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid matcher config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown color mode '{0}' (expected one of: auto, always, never)")]
    InvalidColorMode(String),
}
