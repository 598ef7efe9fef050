use clap::Parser;
use std::time::Duration;
use survey_populate::{SeedArgs, SeedPacing};
use survey_seeder::{AppConfig, CommandConfig, GenerateArgs};

#[derive(Parser)]
struct GenerateCli {
    #[command(flatten)]
    args: GenerateArgs,
}

#[derive(Parser)]
struct SeedCli {
    #[command(flatten)]
    args: SeedArgs,
}

#[test]
fn test_generate_config_from_flags() {
    let cli = GenerateCli::parse_from([
        "generate",
        "--ollama-host",
        "http://gpu-box:11434",
        "--model",
        "mistral",
        "--num-users",
        "4",
        "--num-surveys",
        "2",
        "--min-responses",
        "1",
        "--max-responses",
        "3",
        "--seed",
        "42",
        "--request-timeout-secs",
        "60",
    ]);

    let config = AppConfig::generate("out", &cli.args);
    assert_eq!(config.data.root(), std::path::Path::new("out"));

    let CommandConfig::Generate(generate) = config.command else {
        panic!("Expected generate config");
    };
    assert_eq!(generate.ollama_host, "http://gpu-box:11434");
    assert_eq!(generate.model, "mistral");
    assert_eq!(generate.request_timeout, Duration::from_secs(60));
    assert_eq!(generate.settings.num_users, 4);
    assert_eq!(generate.settings.num_surveys, 2);
    assert_eq!(generate.settings.min_responses_per_survey, 1);
    assert_eq!(generate.settings.max_responses_per_survey, 3);
    assert_eq!(generate.settings.seed, Some(42));
    assert!(generate.settings.validate().is_ok());
}

#[test]
fn test_seed_config_from_flags() {
    let cli = SeedCli::parse_from([
        "seed",
        "--url",
        "https://forms.internal:3000",
        "--api-key",
        "key",
        "--environment-id",
        "env",
        "--dry-run",
    ]);

    let config = AppConfig::seed("data", &cli.args);
    let CommandConfig::Seed(seed) = config.command else {
        panic!("Expected seed config");
    };
    assert!(seed.dry_run);
    assert!(!seed.target.verify_tls);
    assert_eq!(seed.pacing, SeedPacing::default());
    assert_eq!(seed.target.require().unwrap().url, "https://forms.internal:3000");
}
