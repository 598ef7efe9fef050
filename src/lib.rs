//! Survey Seeder Library
//!
//! Generates a synthetic survey dataset (users, surveys, responses) with a
//! local Ollama model and seeds it into a Formbricks instance through its
//! public APIs.
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate data/users.json, data/surveys.json and data/responses.json
//! survey-seeder generate --num-users 10 --num-surveys 5 --seed 42
//!
//! # Check configuration and data files without sending anything
//! survey-seeder seed --dry-run
//!
//! # Seed into Formbricks
//! FORMBRICKS_API_KEY=... FORMBRICKS_ENVIRONMENT_ID=... survey-seeder seed
//! ```
//!
//! Command-line options are turned into an [`AppConfig`] once at start-up and
//! handed to the command handlers in [`commands`].

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use survey_generator::{GenerationSettings, GeneratorError, DEFAULT_OLLAMA_HOST};
use survey_model::{DataDir, ModelError};
use survey_populate::{SeedArgs, SeedError, SeedPacing, SeedTarget};

pub mod commands;

/// Default model requested from Ollama.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";

/// Language-model backend options.
#[derive(Args, Clone, Debug)]
pub struct ModelOpts {
    /// Ollama server URL
    #[arg(long, default_value = DEFAULT_OLLAMA_HOST, env = "OLLAMA_HOST")]
    pub ollama_host: String,

    /// Model used for generation
    #[arg(long, default_value = DEFAULT_OLLAMA_MODEL, env = "OLLAMA_MODEL")]
    pub model: String,

    /// Timeout in seconds for a single generation request
    #[arg(long, default_value = "600")]
    pub request_timeout_secs: u64,
}

/// Dataset size options.
#[derive(Args, Clone, Debug)]
pub struct GenerationOpts {
    /// Number of users to generate (1-100)
    #[arg(long, default_value = "10", env = "NUM_USERS")]
    pub num_users: usize,

    /// Number of surveys to generate (1-20)
    #[arg(long, default_value = "5", env = "NUM_SURVEYS")]
    pub num_surveys: usize,

    /// Minimum responses per survey
    #[arg(long, default_value = "3", env = "MIN_RESPONSES_PER_SURVEY")]
    pub min_responses: usize,

    /// Maximum responses per survey
    #[arg(long, default_value = "8", env = "MAX_RESPONSES_PER_SURVEY")]
    pub max_responses: usize,

    /// Random seed for response sampling (same seed = same responses)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments of the `generate` command.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub model: ModelOpts,

    #[command(flatten)]
    pub generation: GenerationOpts,
}

/// Settings for `generate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub ollama_host: String,
    pub model: String,
    pub request_timeout: Duration,
    pub settings: GenerationSettings,
}

/// Settings for `seed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub target: SeedTarget,
    pub dry_run: bool,
    pub pacing: SeedPacing,
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandConfig {
    Generate(GenerateConfig),
    Seed(SeedConfig),
}

/// Complete run configuration, built once from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interchange directory shared by both commands
    pub data: DataDir,
    pub command: CommandConfig,
}

impl AppConfig {
    pub fn generate(data_dir: impl Into<PathBuf>, args: &GenerateArgs) -> Self {
        let generation = &args.generation;
        Self {
            data: DataDir::new(data_dir),
            command: CommandConfig::Generate(GenerateConfig {
                ollama_host: args.model.ollama_host.clone(),
                model: args.model.model.clone(),
                request_timeout: Duration::from_secs(args.model.request_timeout_secs),
                settings: GenerationSettings {
                    num_users: generation.num_users,
                    num_surveys: generation.num_surveys,
                    min_responses_per_survey: generation.min_responses,
                    max_responses_per_survey: generation.max_responses,
                    seed: generation.seed,
                },
            }),
        }
    }

    pub fn seed(data_dir: impl Into<PathBuf>, args: &SeedArgs) -> Self {
        Self {
            data: DataDir::new(data_dir),
            command: CommandConfig::Seed(SeedConfig {
                target: args.platform.target(),
                dry_run: args.dry_run,
                pacing: SeedPacing::default(),
            }),
        }
    }
}

/// Category of a fatal error, used to pick the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Missing or out-of-range settings
    Config,
    /// A remote service could not be reached
    Connectivity,
    /// An interchange file does not exist yet
    MissingData,
    /// Model output or a data file failed parsing or validation
    Validation,
    /// The language model server or model is not available
    BackendUnavailable,
    Other,
}

impl FailureKind {
    /// Classify by the first library error found in the chain.
    pub fn classify(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<SeedError>() {
                return Self::from_seed(e);
            }
            if let Some(e) = cause.downcast_ref::<GeneratorError>() {
                return Self::from_generator(e);
            }
            if let Some(e) = cause.downcast_ref::<ModelError>() {
                return Self::from_model(e);
            }
        }
        Self::Other
    }

    fn from_seed(err: &SeedError) -> Self {
        match err {
            SeedError::MissingConfig { .. } => Self::Config,
            SeedError::Unreachable { .. } => Self::Connectivity,
            SeedError::Client(_) => Self::Other,
            SeedError::Dataset(e) => Self::from_model(e),
        }
    }

    fn from_generator(err: &GeneratorError) -> Self {
        match err {
            GeneratorError::BackendUnavailable { .. } => Self::BackendUnavailable,
            GeneratorError::Backend(_) => Self::Connectivity,
            GeneratorError::MalformedOutput { .. } | GeneratorError::CountMismatch { .. } => {
                Self::Validation
            }
            GeneratorError::InvalidSettings(_) => Self::Config,
            GeneratorError::Model(e) => Self::from_model(e),
        }
    }

    fn from_model(err: &ModelError) -> Self {
        match err {
            ModelError::NotFound { .. } => Self::MissingData,
            ModelError::Invalid { .. } | ModelError::Json { .. } => Self::Validation,
            ModelError::Io { .. } => Self::Other,
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Self::Other => 1,
            Self::Config => 2,
            Self::Connectivity => 3,
            Self::MissingData => 4,
            Self::Validation => 5,
            Self::BackendUnavailable => 6,
        }
    }
}
