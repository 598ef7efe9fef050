//! CLI argument definitions for the seeding target.

use crate::error::SeedError;
use clap::Args;

/// Default platform URL for a local Formbricks instance.
pub const DEFAULT_FORMBRICKS_URL: &str = "https://localhost:3000";

/// Connection settings for the Formbricks instance.
#[derive(Args, Clone, Debug)]
pub struct PlatformArgs {
    /// Formbricks base URL
    #[arg(long = "url", env = "FORMBRICKS_URL", default_value = DEFAULT_FORMBRICKS_URL)]
    pub url: String,

    /// Management API key
    #[arg(long = "api-key", env = "FORMBRICKS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Environment the users and surveys are created in
    #[arg(long = "environment-id", env = "FORMBRICKS_ENVIRONMENT_ID")]
    pub environment_id: Option<String>,

    /// Verify the server's TLS certificate (self-signed certificates are accepted otherwise)
    #[arg(long)]
    pub verify_tls: bool,
}

/// Arguments of the `seed` command.
#[derive(Args, Clone, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Validate configuration and data files without contacting the platform
    #[arg(long)]
    pub dry_run: bool,
}

impl PlatformArgs {
    pub fn target(&self) -> SeedTarget {
        SeedTarget {
            url: self.url.clone(),
            api_key: self.api_key.clone(),
            environment_id: self.environment_id.clone(),
            verify_tls: self.verify_tls,
        }
    }
}

/// Where to seed, as configured. Credentials may still be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTarget {
    pub url: String,
    pub api_key: Option<String>,
    pub environment_id: Option<String>,
    pub verify_tls: bool,
}

/// A [`SeedTarget`] with every required setting present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Base URL without a trailing slash
    pub url: String,
    pub api_key: String,
    pub environment_id: String,
    pub verify_tls: bool,
}

impl SeedTarget {
    /// Check that the credentials are set, naming every missing one.
    ///
    /// Blank values count as missing.
    pub fn require(&self) -> Result<PlatformConfig, SeedError> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        let api_key = present(&self.api_key);
        let environment_id = present(&self.environment_id);

        match (api_key, environment_id) {
            (Some(api_key), Some(environment_id)) => Ok(PlatformConfig {
                url: self.url.trim().trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
                environment_id: environment_id.to_string(),
                verify_tls: self.verify_tls,
            }),
            (api_key, environment_id) => {
                let mut missing = Vec::new();
                if api_key.is_none() {
                    missing.push("FORMBRICKS_API_KEY");
                }
                if environment_id.is_none() {
                    missing.push("FORMBRICKS_ENVIRONMENT_ID");
                }
                Err(SeedError::MissingConfig { missing })
            }
        }
    }
}
