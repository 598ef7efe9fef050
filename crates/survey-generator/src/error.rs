//! Error types for dataset generation.

use survey_model::ModelError;
use thiserror::Error;

/// Errors that can occur while generating a dataset.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The backend host is unreachable or the model is not installed.
    #[error(
        "Language model '{model}' is not available at {host}.\n\
         Make sure the Ollama server is running and the model is pulled:\n  \
         - verify the server: curl {host}/api/tags\n  \
         - list installed models: ollama list\n  \
         - install the model: ollama pull {model}\n  \
         - or pick another model with --model / OLLAMA_MODEL"
    )]
    BackendUnavailable { host: String, model: String },

    /// Transport or HTTP error talking to the backend.
    #[error("Language model request failed: {0}")]
    Backend(String),

    /// Model output did not parse into the expected artifact.
    #[error("Model output for {artifact} is not valid JSON for its schema: {source}\nOutput began with: {excerpt}")]
    MalformedOutput {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
        excerpt: String,
    },

    /// Model returned fewer items than requested.
    #[error("Model returned {actual} {artifact} but {expected} were requested; try again or lower the count")]
    CountMismatch {
        artifact: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Generation settings are out of range.
    #[error("Invalid generation settings: {0}")]
    InvalidSettings(String),

    /// Parsed data failed validation, or an artifact could not be written.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<reqwest::Error> for GeneratorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Backend(err.to_string())
    }
}
