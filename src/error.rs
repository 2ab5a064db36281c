use reqwest::StatusCode;
use std::process::ExitCode;
use thiserror::Error;

/// Everything that can stop an export before the file is in place.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid group urlname: {0}")]
    InvalidGroup(String),

    #[error("GraphQL request failed with status code {status}: {body}")]
    Transport { status: StatusCode, body: String },

    #[error("GraphQL empty result for group {group}: {reason}")]
    EmptyResult { group: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Meetup API response doesn't match the expected JSON schema: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to write CSV row: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to read configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl ExportError {
    /// Process exit status reported by the binary for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Transport { .. } | Self::Http(_) => 2,
            Self::EmptyResult { .. } => 3,
            Self::Decode(_) => 4,
            Self::InvalidGroup(_) => 64,
            Self::Csv(_) | Self::Io(_) | Self::Config(_) => 1,
        }
    }
}

impl From<&ExportError> for ExitCode {
    fn from(err: &ExportError) -> Self {
        ExitCode::from(err.exit_code())
    }
}

impl From<tempfile::PersistError> for ExportError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
