//! `generate` command handler.

use crate::GenerateConfig;
use anyhow::Context;
use survey_generator::{DataGenerator, GenerationSummary, OllamaBackend};
use survey_model::DataDir;

/// Run the generate command.
pub async fn run_generate(
    data: &DataDir,
    config: &GenerateConfig,
) -> anyhow::Result<GenerationSummary> {
    tracing::info!("Generating synthetic survey data...");
    tracing::info!("Model: {} at {}", config.model, config.ollama_host);
    tracing::info!(
        "Users: {}, surveys: {}, responses per survey: {}-{}",
        config.settings.num_users,
        config.settings.num_surveys,
        config.settings.min_responses_per_survey,
        config.settings.max_responses_per_survey
    );

    let backend = OllamaBackend::new(&config.ollama_host, &config.model, config.request_timeout)
        .context("Failed to create language model client")?;
    let mut generator = DataGenerator::new(backend, config.settings.seed);

    let summary = generator
        .generate_all(data, &config.settings)
        .await
        .with_context(|| format!("Failed to generate dataset in {}", data.root().display()))?;

    tracing::info!(
        "Generated {} users, {} surveys ({} questions) and {} responses in {}",
        summary.users,
        summary.surveys,
        summary.questions,
        summary.responses,
        data.root().display()
    );

    // Single JSON line on stdout for scripting
    println!("{}", serde_json::to_string(&summary)?);

    Ok(summary)
}
