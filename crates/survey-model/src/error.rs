//! Error types for the domain model.

use std::path::PathBuf;

/// Error type for validation and interchange file operations.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A record failed shape validation
    #[error("Invalid {entity}: {reason}")]
    Invalid { entity: String, reason: String },

    /// An interchange file does not exist yet
    #[error("Data file not found: {}. Run `survey-seeder generate` first to create it.", path.display())]
    NotFound { path: PathBuf },

    /// Error reading or writing an interchange file
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Interchange file is not valid JSON for its schema
    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    /// Shorthand for a validation failure.
    pub fn invalid(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error describes malformed data rather than a filesystem problem.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Invalid { .. } | Self::Json { .. })
    }
}
