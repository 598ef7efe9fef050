//! Surveys and their questions.
//!
//! A [`Question`] is a single record whose type-specific fields are all
//! optional. [`Validate`] for a question only looks at the fields its
//! [`QuestionType`] uses; anything else the model emitted is carried along
//! or ignored, never rejected.

use crate::{ModelError, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rating range assumed when a rating question does not set one.
pub const DEFAULT_RATING_RANGE: u32 = 5;

/// Supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    MultipleChoiceSingle,
    MultipleChoiceMulti,
    OpenText,
    Rating,
    Nps,
    Cta,
    Consent,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoiceSingle => "multipleChoiceSingle",
            Self::MultipleChoiceMulti => "multipleChoiceMulti",
            Self::OpenText => "openText",
            Self::Rating => "rating",
            Self::Nps => "nps",
            Self::Cta => "cta",
            Self::Consent => "consent",
        }
    }

    /// Whether questions of this type must carry a choice set.
    pub fn has_choices(&self) -> bool {
        matches!(self, Self::MultipleChoiceSingle | Self::MultipleChoiceMulti)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Choice option for multiple choice questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionChoice {
    /// Identifier, unique within the question
    pub id: String,

    /// Display text
    pub label: String,
}

impl QuestionChoice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A survey question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the survey
    pub id: String,

    #[serde(rename = "type")]
    pub question_type: QuestionType,

    pub headline: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheader: Option<String>,

    #[serde(default = "default_true")]
    pub required: bool,

    /// Choices (multiple choice types)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<QuestionChoice>>,

    /// Rating scale, e.g. `number` or `smiley`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,

    /// Rating range, e.g. 5 for a 1-5 scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,

    #[serde(
        default,
        rename = "lowerLabel",
        skip_serializing_if = "Option::is_none"
    )]
    pub lower_label: Option<String>,

    #[serde(
        default,
        rename = "upperLabel",
        skip_serializing_if = "Option::is_none"
    )]
    pub upper_label: Option<String>,
}

impl Question {
    /// Create a question with only the common fields set.
    pub fn new(
        id: impl Into<String>,
        question_type: QuestionType,
        headline: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question_type,
            headline: headline.into(),
            subheader: None,
            required: true,
            choices: None,
            scale: None,
            range: None,
            lower_label: None,
            upper_label: None,
        }
    }

    /// Builder-style helper to attach choices.
    pub fn with_choices(mut self, choices: Vec<QuestionChoice>) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Builder-style helper to set the rating range.
    pub fn with_range(mut self, range: u32) -> Self {
        self.range = Some(range);
        self
    }

    /// Upper bound for rating answers; [`DEFAULT_RATING_RANGE`] when unset or zero.
    pub fn rating_range(&self) -> u32 {
        self.range
            .filter(|r| *r > 0)
            .unwrap_or(DEFAULT_RATING_RANGE)
    }

    /// Choices as a slice, empty when absent.
    pub fn choice_list(&self) -> &[QuestionChoice] {
        self.choices.as_deref().unwrap_or_default()
    }

    /// Whether `id` names one of this question's choices.
    pub fn has_choice(&self, id: &str) -> bool {
        self.choice_list().iter().any(|c| c.id == id)
    }
}

impl Validate for Question {
    fn validate(&self) -> Result<(), ModelError> {
        let entity = || format!("question '{}'", self.id);

        if self.id.trim().is_empty() {
            return Err(ModelError::invalid(
                format!("question '{}'", self.headline),
                "id must not be empty",
            ));
        }

        match self.question_type {
            QuestionType::MultipleChoiceSingle | QuestionType::MultipleChoiceMulti => {
                let choices = self.choice_list();
                if choices.is_empty() {
                    return Err(ModelError::invalid(
                        entity(),
                        format!("{} requires at least one choice", self.question_type),
                    ));
                }
                let mut seen = HashSet::with_capacity(choices.len());
                for choice in choices {
                    if !seen.insert(choice.id.as_str()) {
                        return Err(ModelError::invalid(
                            entity(),
                            format!("duplicate choice id '{}'", choice.id),
                        ));
                    }
                }
            }
            QuestionType::Rating => {
                if self.range == Some(0) {
                    return Err(ModelError::invalid(entity(), "rating range must be at least 1"));
                }
            }
            QuestionType::Nps
            | QuestionType::OpenText
            | QuestionType::Cta
            | QuestionType::Consent => {}
        }

        Ok(())
    }
}

fn default_status() -> String {
    "draft".to_string()
}

fn default_survey_type() -> String {
    "link".to_string()
}

/// A survey with its questions in presentation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    /// Local identifier, unique within a dataset
    pub id: String,

    /// Internal survey name
    pub name: String,

    pub questions: Vec<Question>,

    /// e.g. `draft`, `inProgress`, `completed`
    #[serde(default = "default_status")]
    pub status: String,

    /// e.g. `link`, `web`, `app`
    #[serde(rename = "type", default = "default_survey_type")]
    pub survey_type: String,

    /// Passed through to the platform verbatim
    #[serde(
        default,
        rename = "welcomeCard",
        skip_serializing_if = "Option::is_none"
    )]
    pub welcome_card: Option<serde_json::Value>,

    /// Passed through to the platform verbatim
    #[serde(
        default,
        rename = "thankYouCard",
        skip_serializing_if = "Option::is_none"
    )]
    pub thank_you_card: Option<serde_json::Value>,
}

impl Survey {
    pub fn new(id: impl Into<String>, name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            questions,
            status: default_status(),
            survey_type: default_survey_type(),
            welcome_card: None,
            thank_you_card: None,
        }
    }

    /// Get a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

impl Validate for Survey {
    fn validate(&self) -> Result<(), ModelError> {
        if self.id.trim().is_empty() {
            return Err(ModelError::invalid(
                format!("survey '{}'", self.name),
                "id must not be empty",
            ));
        }

        let mut seen = HashSet::with_capacity(self.questions.len());
        for question in &self.questions {
            question.validate().map_err(|e| match e {
                ModelError::Invalid { entity, reason } => ModelError::Invalid {
                    entity: format!("{entity} in survey '{}'", self.id),
                    reason,
                },
                other => other,
            })?;
            if !seen.insert(question.id.as_str()) {
                return Err(ModelError::invalid(
                    format!("survey '{}'", self.id),
                    format!("duplicate question id '{}'", question.id),
                ));
            }
        }

        Ok(())
    }
}

/// Collection of surveys in generation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyList {
    pub surveys: Vec<Survey>,
}

impl SurveyList {
    pub fn len(&self) -> usize {
        self.surveys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surveys.is_empty()
    }

    /// Get a survey by local id.
    pub fn get(&self, id: &str) -> Option<&Survey> {
        self.surveys.iter().find(|s| s.id == id)
    }

    /// Total number of questions across all surveys.
    pub fn question_count(&self) -> usize {
        self.surveys.iter().map(|s| s.questions.len()).sum()
    }
}

impl Validate for SurveyList {
    fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::with_capacity(self.surveys.len());
        for survey in &self.surveys {
            survey.validate()?;
            if !seen.insert(survey.id.as_str()) {
                return Err(ModelError::invalid(
                    "survey list",
                    format!("duplicate survey id '{}'", survey.id),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURVEY_JSON: &str = r#"{
        "id": "survey-1",
        "name": "Onboarding Feedback",
        "questions": [
            {
                "id": "q1",
                "type": "rating",
                "headline": "How easy was setup?",
                "required": true,
                "scale": "number",
                "range": 5,
                "lowerLabel": "Hard",
                "upperLabel": "Easy"
            },
            {
                "id": "q2",
                "type": "multipleChoiceSingle",
                "headline": "Which plan are you on?",
                "choices": [
                    {"id": "choice-1", "label": "Free"},
                    {"id": "choice-2", "label": "Pro"}
                ],
                "placeholder": "ignored extra key"
            },
            {"id": "q3", "type": "openText", "headline": "Anything else?", "required": false}
        ],
        "status": "inProgress",
        "type": "link"
    }"#;

    #[test]
    fn test_parse_survey_with_extra_keys() {
        let survey: Survey = serde_json::from_str(SURVEY_JSON).unwrap();
        assert_eq!(survey.questions.len(), 3);
        assert_eq!(survey.questions[0].question_type, QuestionType::Rating);
        assert_eq!(survey.questions[0].lower_label.as_deref(), Some("Hard"));
        assert!(survey.questions[1].required);
        assert!(!survey.questions[2].required);
        assert_eq!(survey.survey_type, "link");
        survey.validate().unwrap();
    }

    #[test]
    fn test_question_order_is_preserved() {
        let survey: Survey = serde_json::from_str(SURVEY_JSON).unwrap();
        let ids: Vec<&str> = survey.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_survey_defaults() {
        let survey: Survey = serde_json::from_str(
            r#"{"id": "s", "name": "Minimal", "questions": []}"#,
        )
        .unwrap();
        assert_eq!(survey.status, "draft");
        assert_eq!(survey.survey_type, "link");
        assert!(survey.welcome_card.is_none());
    }

    #[test]
    fn test_serialized_keys_match_interchange_format() {
        let survey: Survey = serde_json::from_str(SURVEY_JSON).unwrap();
        let json = serde_json::to_value(&survey).unwrap();
        assert_eq!(json["type"], "link");
        assert_eq!(json["questions"][0]["type"], "rating");
        assert_eq!(json["questions"][0]["upperLabel"], "Easy");
        assert!(json["questions"][2].get("choices").is_none());
        assert!(json.get("thankYouCard").is_none());
    }

    #[test]
    fn test_unknown_question_type_is_rejected() {
        let result: Result<Question, _> =
            serde_json::from_str(r#"{"id": "q", "type": "matrix", "headline": "?"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_multiple_choice_requires_choices() {
        let question = Question::new("q1", QuestionType::MultipleChoiceMulti, "Pick some");
        let err = question.validate().unwrap_err();
        assert!(err.to_string().contains("at least one choice"));

        let empty = question.clone().with_choices(vec![]);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_duplicate_choice_ids_rejected() {
        let question = Question::new("q1", QuestionType::MultipleChoiceSingle, "Pick one")
            .with_choices(vec![
                QuestionChoice::new("a", "A"),
                QuestionChoice::new("a", "Also A"),
            ]);
        assert!(question.validate().is_err());
    }

    #[test]
    fn test_irrelevant_fields_are_not_validated() {
        let mut question = Question::new("q1", QuestionType::OpenText, "Thoughts?");
        question.choices = Some(vec![]);
        question.range = Some(0);
        question.validate().unwrap();
    }

    #[test]
    fn test_rating_range_default() {
        let question = Question::new("q1", QuestionType::Rating, "Rate us");
        assert_eq!(question.rating_range(), DEFAULT_RATING_RANGE);
        assert_eq!(question.with_range(10).rating_range(), 10);
    }

    #[test]
    fn test_duplicate_question_ids_rejected() {
        let survey = Survey::new(
            "s1",
            "Dupes",
            vec![
                Question::new("q1", QuestionType::OpenText, "One"),
                Question::new("q1", QuestionType::Nps, "Two"),
            ],
        );
        let err = survey.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate question id"));
    }

    #[test]
    fn test_invalid_question_names_its_survey() {
        let survey = Survey::new(
            "s9",
            "Broken",
            vec![Question::new("q1", QuestionType::MultipleChoiceSingle, "Pick")],
        );
        let err = survey.validate().unwrap_err();
        assert!(err.to_string().contains("survey 's9'"));
    }

    #[test]
    fn test_duplicate_survey_ids_rejected() {
        let list = SurveyList {
            surveys: vec![
                Survey::new("s1", "First", vec![]),
                Survey::new("s1", "Second", vec![]),
            ],
        };
        assert!(list.validate().is_err());
    }

    #[test]
    fn test_cards_pass_through_verbatim() {
        let survey: Survey = serde_json::from_str(
            r#"{"id": "s", "name": "Cards", "questions": [],
                "welcomeCard": {"enabled": true, "headline": "Hi", "timeToFinish": false}}"#,
        )
        .unwrap();
        let card = survey.welcome_card.as_ref().unwrap();
        assert_eq!(card["timeToFinish"], false);
        let json = serde_json::to_value(&survey).unwrap();
        assert_eq!(json["welcomeCard"]["headline"], "Hi");
    }
}
