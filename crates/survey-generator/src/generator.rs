//! Dataset generator driving a [`LanguageModel`].

use crate::answers::answer_for_question;
use crate::backend::{ensure_model_available, LanguageModel};
use crate::error::GeneratorError;
use crate::extract::extract_payload;
use crate::prompts::{surveys_prompt, users_prompt, SURVEYS_SYSTEM_PROMPT, USERS_SYSTEM_PROMPT};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::Serialize;
use survey_model::{
    Answer, DataDir, Response, ResponseList, SurveyList, UserList, Validate, RESPONSES_FILE,
    SURVEYS_FILE, USERS_FILE,
};

/// Largest user count accepted in one run.
pub const MAX_USERS: usize = 100;

/// Largest survey count accepted in one run.
pub const MAX_SURVEYS: usize = 20;

const EXCERPT_CHARS: usize = 200;

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    pub num_users: usize,
    pub num_surveys: usize,
    pub min_responses_per_survey: usize,
    pub max_responses_per_survey: usize,
    /// Seed for response sampling; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            num_users: 10,
            num_surveys: 5,
            min_responses_per_survey: 3,
            max_responses_per_survey: 8,
            seed: None,
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !(1..=MAX_USERS).contains(&self.num_users) {
            return Err(GeneratorError::InvalidSettings(format!(
                "number of users must be between 1 and {MAX_USERS}, got {}",
                self.num_users
            )));
        }
        if !(1..=MAX_SURVEYS).contains(&self.num_surveys) {
            return Err(GeneratorError::InvalidSettings(format!(
                "number of surveys must be between 1 and {MAX_SURVEYS}, got {}",
                self.num_surveys
            )));
        }
        if self.min_responses_per_survey < 1 {
            return Err(GeneratorError::InvalidSettings(
                "minimum responses per survey must be at least 1".to_string(),
            ));
        }
        if self.max_responses_per_survey < self.min_responses_per_survey {
            return Err(GeneratorError::InvalidSettings(format!(
                "maximum responses per survey ({}) is below the minimum ({})",
                self.max_responses_per_survey, self.min_responses_per_survey
            )));
        }
        Ok(())
    }
}

/// Counts produced by [`DataGenerator::generate_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub users: usize,
    pub surveys: usize,
    pub questions: usize,
    pub responses: usize,
}

/// Lists whose length the model controls.
trait ItemList {
    fn item_count(&self) -> usize;
    fn truncate_items(&mut self, len: usize);
}

impl ItemList for UserList {
    fn item_count(&self) -> usize {
        self.users.len()
    }

    fn truncate_items(&mut self, len: usize) {
        self.users.truncate(len);
    }
}

impl ItemList for SurveyList {
    fn item_count(&self) -> usize {
        self.surveys.len()
    }

    fn truncate_items(&mut self, len: usize) {
        self.surveys.truncate(len);
    }
}

/// Generates users and surveys through a language model and synthesizes
/// responses locally.
pub struct DataGenerator<M: LanguageModel> {
    backend: M,
    rng: StdRng,
}

impl<M: LanguageModel> DataGenerator<M> {
    /// Create a generator. Response sampling is reproducible when `seed` is given.
    pub fn new(backend: M, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { backend, rng }
    }

    pub fn backend(&self) -> &M {
        &self.backend
    }

    /// Ask the model for exactly `count` users.
    pub async fn generate_users(&mut self, count: usize) -> Result<UserList, GeneratorError> {
        tracing::info!("Generating {} users...", count);
        let users: UserList = self
            .request_list("users", USERS_SYSTEM_PROMPT, &users_prompt(count), count)
            .await?;
        tracing::info!("Generated {} users", users.len());
        Ok(users)
    }

    /// Ask the model for exactly `count` surveys.
    pub async fn generate_surveys(&mut self, count: usize) -> Result<SurveyList, GeneratorError> {
        tracing::info!("Generating {} surveys...", count);
        let surveys: SurveyList = self
            .request_list("surveys", SURVEYS_SYSTEM_PROMPT, &surveys_prompt(count), count)
            .await?;
        tracing::info!(
            "Generated {} surveys with {} questions",
            surveys.len(),
            surveys.question_count()
        );
        Ok(surveys)
    }

    async fn request_list<T>(
        &self,
        artifact: &'static str,
        system: &str,
        prompt: &str,
        count: usize,
    ) -> Result<T, GeneratorError>
    where
        T: DeserializeOwned + Validate + ItemList,
    {
        let reply = self.backend.chat(Some(system), prompt).await?;
        tracing::debug!("Raw {} reply ({} bytes)", artifact, reply.len());

        let payload = extract_payload(&reply);
        let mut list: T =
            serde_json::from_str(payload).map_err(|source| GeneratorError::MalformedOutput {
                artifact,
                source,
                excerpt: excerpt(&reply),
            })?;

        let actual = list.item_count();
        if actual > count {
            tracing::warn!(
                "Model returned {} {} but {} were requested; dropping the surplus",
                actual,
                artifact,
                count
            );
            list.truncate_items(count);
        } else if actual < count {
            return Err(GeneratorError::CountMismatch {
                artifact,
                expected: count,
                actual,
            });
        }

        list.validate()?;
        Ok(list)
    }

    /// Synthesize responses for every survey.
    ///
    /// Each survey receives between `min` and `max` responses, capped at the
    /// number of users; respondents are distinct within a survey and every
    /// question is answered exactly once.
    pub fn generate_responses(
        &mut self,
        surveys: &SurveyList,
        users: &UserList,
        min: usize,
        max: usize,
    ) -> ResponseList {
        tracing::info!("Generating responses...");
        let mut responses = Vec::new();

        for survey in &surveys.surveys {
            let wanted = self.rng.gen_range(min..=max.max(min));
            let count = wanted.min(users.len());
            if count < wanted {
                tracing::debug!(
                    "Survey '{}' capped at {} responses (only {} users)",
                    survey.id,
                    count,
                    users.len()
                );
            }

            let respondents: Vec<_> = users
                .users
                .choose_multiple(&mut self.rng, count)
                .collect();

            for user in respondents {
                let answers = survey
                    .questions
                    .iter()
                    .map(|q| Answer::new(q.id.clone(), answer_for_question(&mut self.rng, q)))
                    .collect();

                responses.push(Response {
                    survey_id: survey.id.clone(),
                    user_email: user.email.clone(),
                    answers,
                    finished: true,
                });
            }
        }

        tracing::info!("Generated {} responses", responses.len());
        ResponseList { responses }
    }

    /// Run the full pipeline and write the three artifacts into `dir`.
    ///
    /// Artifacts are written as soon as they are produced, so a failure in a
    /// later step leaves the earlier files in place.
    pub async fn generate_all(
        &mut self,
        dir: &DataDir,
        settings: &GenerationSettings,
    ) -> Result<GenerationSummary, GeneratorError> {
        settings.validate()?;
        ensure_model_available(&self.backend).await?;
        dir.ensure()?;

        let users = self.generate_users(settings.num_users).await?;
        let path = dir.write(USERS_FILE, &users)?;
        tracing::info!("Saved {}", path.display());

        let surveys = self.generate_surveys(settings.num_surveys).await?;
        let path = dir.write(SURVEYS_FILE, &surveys)?;
        tracing::info!("Saved {}", path.display());

        let responses = self.generate_responses(
            &surveys,
            &users,
            settings.min_responses_per_survey,
            settings.max_responses_per_survey,
        );
        let path = dir.write(RESPONSES_FILE, &responses)?;
        tracing::info!("Saved {}", path.display());

        Ok(GenerationSummary {
            users: users.len(),
            surveys: surveys.len(),
            questions: surveys.question_count(),
            responses: responses.len(),
        })
    }
}

fn excerpt(text: &str) -> String {
    let mut out: String = text.chars().take(EXCERPT_CHARS).collect();
    if text.chars().count() > EXCERPT_CHARS {
        out.push_str("...");
    }
    out
}
