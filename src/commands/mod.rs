//! Command handlers.
//!
//! Each handler takes the parsed [`crate::AppConfig`] parts by reference and
//! returns an `anyhow` error carrying context for the top-level report.

pub mod generate;
pub mod seed;

use crate::{AppConfig, CommandConfig};

/// Dispatch to the handler for the configured command.
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    match &config.command {
        CommandConfig::Generate(generate) => {
            generate::run_generate(&config.data, generate).await?;
        }
        CommandConfig::Seed(seed) => {
            seed::run_seed(&config.data, seed).await?;
        }
    }
    Ok(())
}
