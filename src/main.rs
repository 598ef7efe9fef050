//! Command-line interface for survey-seeder
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! # Ten users, five surveys, 3-8 responses each, using llama2 on the local Ollama
//! survey-seeder generate
//!
//! # Smaller, reproducible dataset with another model
//! survey-seeder generate --model mistral --num-users 5 --num-surveys 2 \
//!   --min-responses 1 --max-responses 3 --seed 42
//! ```
//!
//! ## Seed
//! ```bash
//! # Validate configuration and data files only
//! survey-seeder seed --dry-run
//!
//! # Replay data/ against a local Formbricks
//! survey-seeder seed \
//!   --url https://localhost:3000 \
//!   --api-key "$FORMBRICKS_API_KEY" \
//!   --environment-id "$FORMBRICKS_ENVIRONMENT_ID"
//! ```
//!
//! ## Exit Status
//! - 0: success (individual seeding failures are logged, not fatal)
//! - 1: unexpected error
//! - 2: missing or invalid configuration
//! - 3: Ollama or Formbricks unreachable
//! - 4: data file missing (run `generate` first)
//! - 5: model output or data file failed validation
//! - 6: requested model not available

use clap::{Parser, Subcommand};
use survey_populate::SeedArgs;
use survey_seeder::{commands, AppConfig, FailureKind, GenerateArgs};

#[derive(Parser)]
#[command(name = "survey-seeder")]
#[command(about = "Generate synthetic survey data with Ollama and seed it into Formbricks")]
#[command(long_about = None)]
struct Cli {
    /// Directory holding users.json, surveys.json and responses.json
    #[arg(long, global = true, default_value = "data", env = "DATA_DIR")]
    data_dir: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate users, surveys and responses with a local language model
    Generate(GenerateArgs),

    /// Seed generated data into Formbricks
    Seed(SeedArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(FailureKind::classify(&e).exit_code());
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::Generate(args) => AppConfig::generate(&cli.data_dir, args),
        Commands::Seed(args) => AppConfig::seed(&cli.data_dir, args),
    };

    commands::run(&config).await
}
