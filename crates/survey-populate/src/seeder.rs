//! Replays a generated dataset against a [`SurveyPlatform`].
//!
//! Stages run in dependency order: users, then surveys, then responses.
//! Every item is submitted once; failures are logged, counted and skipped.

use crate::client::SurveyPlatform;
use crate::error::{PlatformError, SeedError};
use crate::id_map::IdMap;
use crate::metrics::{SeedOutcome, SeedReport};
use crate::payload::{MemberPayload, ResponsePayload, SurveyPayload};
use std::time::{Duration, Instant};
use survey_model::{DataDir, Dataset, ResponseList, SurveyList, UserList};
use tracing::{debug, error, info, warn};

/// Fixed delays between consecutive submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPacing {
    pub between_users: Duration,
    pub between_surveys: Duration,
    pub between_responses: Duration,
}

impl Default for SeedPacing {
    fn default() -> Self {
        Self {
            between_users: Duration::from_millis(500),
            between_surveys: Duration::from_millis(500),
            between_responses: Duration::from_millis(300),
        }
    }
}

impl SeedPacing {
    /// No delays at all.
    pub fn none() -> Self {
        Self {
            between_users: Duration::ZERO,
            between_surveys: Duration::ZERO,
            between_responses: Duration::ZERO,
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

fn log_failure_detail(err: &PlatformError) {
    if let Some(detail) = err.detail() {
        error!("  Error details: {}", detail);
    }
}

/// Load and cross-check the dataset without contacting the platform.
///
/// Returns the dataset together with the number of dangling references,
/// each of which is logged as a warning.
pub fn load_dataset(dir: &DataDir) -> Result<(Dataset, usize), SeedError> {
    info!("Loading data files from {}", dir.root().display());
    let dataset = Dataset::load(dir)?;
    info!(
        "Loaded: {} users, {} surveys, {} responses",
        dataset.users.len(),
        dataset.surveys.len(),
        dataset.responses.len()
    );

    let dangling = dataset.responses.dangling_references(&dataset.surveys);
    for reference in &dangling {
        warn!("Dangling reference: {}", reference);
    }
    let unknown_users = dataset
        .responses
        .responses
        .iter()
        .filter(|r| dataset.users.find_by_email(&r.user_email).is_none())
        .count();
    if unknown_users > 0 {
        warn!("{} responses reference users not in users.json", unknown_users);
    }

    Ok((dataset, dangling.len()))
}

/// Log what a seeding run would submit.
pub fn dry_run(dir: &DataDir, base_url: &str) -> Result<SeedReport, SeedError> {
    let (dataset, dangling_references) = load_dataset(dir)?;

    info!("Dry-run mode: no requests will be sent to {}", base_url);
    info!("Would create {} members", dataset.users.len());
    for survey in &dataset.surveys.surveys {
        info!(
            "Would create survey '{}' ({} questions, {} responses)",
            survey.name,
            survey.questions.len(),
            dataset.responses.for_survey(&survey.id).count()
        );
        debug!(
            "Survey payload: {}",
            serde_json::to_string(&SurveyPayload::from_survey(survey)).unwrap_or_default()
        );
    }
    info!("Would submit {} responses", dataset.responses.len());

    Ok(SeedReport {
        dangling_references,
        ..Default::default()
    })
}

/// Seeds users, surveys and responses, tracking the ids the platform assigns.
pub struct Seeder<P: SurveyPlatform> {
    platform: P,
    pacing: SeedPacing,
    users: IdMap,
    surveys: IdMap,
}

impl<P: SurveyPlatform> Seeder<P> {
    pub fn new(platform: P, pacing: SeedPacing) -> Self {
        Self {
            platform,
            pacing,
            users: IdMap::new(),
            surveys: IdMap::new(),
        }
    }

    /// Preload the survey mapping so single stages can be exercised alone.
    #[cfg(test)]
    pub(crate) fn with_survey_ids(mut self, surveys: IdMap) -> Self {
        self.surveys = surveys;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Email to remote member id.
    pub fn user_ids(&self) -> &IdMap {
        &self.users
    }

    /// Local survey id to remote survey id.
    pub fn survey_ids(&self) -> &IdMap {
        &self.surveys
    }

    /// Create a member per user.
    ///
    /// The platform may not support member creation at all, so a failure
    /// maps the email to itself and moves on.
    pub async fn seed_users(&mut self, users: &UserList) -> SeedOutcome {
        info!("Seeding {} users...", users.len());
        let start = Instant::now();
        let mut outcome = SeedOutcome::default();

        for user in &users.users {
            let payload = MemberPayload::from_user(user);
            match self.platform.create_member(&payload).await {
                Ok(id) => {
                    let id = id.unwrap_or_else(|| user.email.clone());
                    info!("  Created member {} ({})", user.name, user.email);
                    self.users.insert(user.email.clone(), id);
                    outcome.record(true);
                }
                Err(e) => {
                    warn!("  Member {} ({}) not created: {}", user.name, user.email, e);
                    self.users.insert(user.email.clone(), user.email.clone());
                    outcome.record(false);
                }
            }
            pause(self.pacing.between_users).await;
        }

        outcome.duration = start.elapsed();
        info!("User seeding complete: {}", outcome);
        outcome
    }

    /// Create every survey and remember its remote id.
    ///
    /// A failed survey maps to its local id so its responses are still
    /// attempted.
    pub async fn seed_surveys(&mut self, surveys: &SurveyList) -> SeedOutcome {
        info!("Seeding {} surveys...", surveys.len());
        let start = Instant::now();
        let mut outcome = SeedOutcome::default();

        for survey in &surveys.surveys {
            let payload = SurveyPayload::from_survey(survey);
            match self.platform.create_survey(&payload).await {
                Ok(Some(remote)) => {
                    info!(
                        "  Created survey '{}' ({} questions) as {}",
                        survey.name,
                        survey.questions.len(),
                        remote
                    );
                    self.surveys.insert(survey.id.clone(), remote);
                    outcome.record(true);
                }
                Ok(None) => {
                    warn!(
                        "  Survey '{}' created but no id was returned; responses will use '{}'",
                        survey.name, survey.id
                    );
                    outcome.record(true);
                }
                Err(e) => {
                    error!("  Survey '{}' failed: {}", survey.name, e);
                    log_failure_detail(&e);
                    self.surveys.insert(survey.id.clone(), survey.id.clone());
                    outcome.record(false);
                }
            }
            pause(self.pacing.between_surveys).await;
        }

        outcome.duration = start.elapsed();
        info!("Survey seeding complete: {}", outcome);
        outcome
    }

    /// Submit every response to its survey's remote id.
    pub async fn seed_responses(&mut self, responses: &ResponseList) -> SeedOutcome {
        info!("Seeding {} responses...", responses.len());
        let start = Instant::now();
        let mut outcome = SeedOutcome::default();

        for response in &responses.responses {
            let survey_id = self.surveys.resolve(&response.survey_id);
            let payload = ResponsePayload::new(response, survey_id);
            match self.platform.submit_response(survey_id, &payload).await {
                Ok(()) => {
                    debug!("  Response from {} submitted", response.user_email);
                    outcome.record(true);
                }
                Err(e) => {
                    warn!(
                        "  Response from {} to survey {} failed: {}",
                        response.user_email, survey_id, e
                    );
                    log_failure_detail(&e);
                    outcome.record(false);
                }
            }
            pause(self.pacing.between_responses).await;
        }

        outcome.duration = start.elapsed();
        info!("Response seeding complete: {}", outcome);
        outcome
    }

    /// Probe the platform, load the dataset from `dir` and seed all of it.
    ///
    /// Id mappings from earlier runs are discarded first.
    pub async fn seed_all(&mut self, dir: &DataDir) -> Result<SeedReport, SeedError> {
        self.users.clear();
        self.surveys.clear();

        let url = self.platform.base_url().to_string();
        info!("Checking Formbricks connection at {}", url);
        if !self.platform.probe().await {
            return Err(SeedError::Unreachable { url });
        }
        info!("Connected to Formbricks");

        let (dataset, dangling_references) = load_dataset(dir)?;

        let users = self.seed_users(&dataset.users).await;
        let surveys = self.seed_surveys(&dataset.surveys).await;
        let responses = self.seed_responses(&dataset.responses).await;

        let report = SeedReport {
            users,
            surveys,
            responses,
            dangling_references,
        };
        report.log_summary(&url);
        Ok(report)
    }
}
