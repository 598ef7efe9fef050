//! Error types for seeding.

use survey_model::ModelError;
use thiserror::Error;

/// Errors that abort a seeding run.
///
/// Failures of individual items never surface here; they are counted in the
/// stage's [`crate::SeedOutcome`] instead.
#[derive(Error, Debug)]
pub enum SeedError {
    /// Required target settings are missing.
    #[error("Missing required setting: {}. Set it in the environment or pass it on the command line.", .missing.join(", "))]
    MissingConfig { missing: Vec<&'static str> },

    /// The platform did not answer the connectivity probe.
    #[error("Cannot connect to Formbricks at {url}. Make sure it is running (e.g. `docker compose up -d` in your Formbricks checkout) and that the URL is correct.")]
    Unreachable { url: String },

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// The interchange files could not be loaded.
    #[error(transparent)]
    Dataset(#[from] ModelError),
}

/// Failure of a single platform call.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The platform answered with a non-success status.
    #[error("HTTP {status}")]
    Status { status: u16, body: String },

    /// The request did not complete.
    #[error("request failed: {0}")]
    Transport(String),
}

impl PlatformError {
    /// Structured error detail, when the response body is JSON.
    pub fn detail(&self) -> Option<serde_json::Value> {
        match self {
            Self::Status { body, .. } => serde_json::from_str(body).ok(),
            Self::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
