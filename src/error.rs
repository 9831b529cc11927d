use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("No input format given. Use --format or --pattern (or set format/pattern in config)")]
    NoFormat,

    #[error("Both a format ('{0}') and a custom pattern were given; pick one")]
    FormatAndPattern(String),
}

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Unrecognized input format: {0}")]
    UnknownFormat(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid level map: {0}")]
    InvalidLevelMap(String),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Malformed hunk header: {0}")]
    MalformedHunkHeader(String),
}

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("gh CLI failed: {0}")]
    GhCli(String),

    #[error("Failed to parse gh output: {0}")]
    ParseOutput(String),

    #[error("gh call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Diff error: {0}")]
    Diff(#[from] DiffError),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write output '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
