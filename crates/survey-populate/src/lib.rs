//! Formbricks seeder for generated survey datasets.
//!
//! Reads the interchange files written by `survey-generator` and replays them
//! against a running Formbricks instance: members and surveys through the
//! management API, responses through the client API. Local survey ids are
//! translated to the ids the platform assigns as the run progresses.
//!
//! # Example
//!
//! ```ignore
//! use survey_populate::{HttpPlatform, SeedPacing, Seeder};
//! use survey_model::DataDir;
//!
//! let config = target.require()?;
//! let mut seeder = Seeder::new(HttpPlatform::new(&config)?, SeedPacing::default());
//! let report = seeder.seed_all(&DataDir::new("data")).await?;
//! println!("{} items failed", report.total_failed());
//! ```

pub mod args;
pub mod client;
pub mod error;
pub mod id_map;
pub mod metrics;
pub mod payload;
pub mod seeder;

pub use args::{PlatformArgs, PlatformConfig, SeedArgs, SeedTarget, DEFAULT_FORMBRICKS_URL};
pub use client::{HttpPlatform, SurveyPlatform};
pub use error::{PlatformError, SeedError};
pub use id_map::IdMap;
pub use metrics::{SeedOutcome, SeedReport};
pub use payload::{MemberPayload, QuestionPayload, ResponsePayload, SurveyPayload};
pub use seeder::{dry_run, load_dataset, SeedPacing, Seeder};
