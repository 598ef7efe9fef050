//! `seed` command handler.

use crate::SeedConfig;
use anyhow::Context;
use survey_model::DataDir;
use survey_populate::{dry_run, HttpPlatform, SeedReport, Seeder};

/// Run the seed command.
pub async fn run_seed(data: &DataDir, config: &SeedConfig) -> anyhow::Result<SeedReport> {
    let platform_config = config.target.require()?;

    if config.dry_run {
        let report = dry_run(data, &platform_config.url)
            .context("Dry run failed: the dataset could not be loaded")?;
        tracing::info!("Dry run complete: configuration and data files are valid");
        return Ok(report);
    }

    tracing::info!("Seeding {} from {}", platform_config.url, data.root().display());
    if !platform_config.verify_tls {
        tracing::debug!("TLS certificate verification disabled");
    }

    let platform = HttpPlatform::new(&platform_config)?;
    let mut seeder = Seeder::new(platform, config.pacing);
    let report = seeder.seed_all(data).await.context("Seeding failed")?;

    if report.total_failed() > 0 {
        tracing::warn!(
            "{} items failed and were skipped; see the log above for details",
            report.total_failed()
        );
    }

    Ok(report)
}
