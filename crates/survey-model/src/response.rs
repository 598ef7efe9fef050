//! Survey responses and answer values.

use crate::survey::{Question, QuestionType, SurveyList};
use crate::{ModelError, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Largest NPS score.
pub const NPS_MAX: i64 = 10;

/// Value of a single answer.
///
/// The shape is chosen by the owning question's type:
///
/// | Question type          | Variant                  |
/// |------------------------|--------------------------|
/// | `rating`, `nps`        | [`AnswerValue::Score`]   |
/// | `multipleChoiceSingle` | [`AnswerValue::Choice`]  |
/// | `multipleChoiceMulti`  | [`AnswerValue::Choices`] |
/// | everything else        | [`AnswerValue::Text`]    |
///
/// On disk and on the wire the value is the bare JSON number, array or string.
/// A bare string reads back as [`AnswerValue::Text`]; [`AnswerValue::for_question`]
/// (applied by [`ResponseList::key_by_question_type`]) turns it into a
/// [`AnswerValue::Choice`] where the question is a single choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Score(i64),
    #[serde(skip_deserializing)]
    Choice(String),
    Choices(Vec<String>),
    Text(String),
}

impl AnswerValue {
    /// Re-key a value read from disk by the type of the question it answers.
    pub fn for_question(self, question_type: QuestionType) -> Self {
        match (question_type, self) {
            (QuestionType::MultipleChoiceSingle, Self::Text(id)) => Self::Choice(id),
            (QuestionType::MultipleChoiceSingle, value) => value,
            (_, Self::Choice(text)) => Self::Text(text),
            (_, value) => value,
        }
    }

    /// Check this value against the domain of `question`'s type.
    ///
    /// Choice ids are only checked when the question actually has choices,
    /// since generation falls back to a literal id otherwise.
    pub fn conforms_to(&self, question: &Question) -> Result<(), String> {
        match (question.question_type, self) {
            (QuestionType::Rating, Self::Score(v)) => {
                let max = i64::from(question.rating_range());
                if (1..=max).contains(v) {
                    Ok(())
                } else {
                    Err(format!("rating {v} outside 1..={max}"))
                }
            }
            (QuestionType::Nps, Self::Score(v)) => {
                if (0..=NPS_MAX).contains(v) {
                    Ok(())
                } else {
                    Err(format!("nps score {v} outside 0..={NPS_MAX}"))
                }
            }
            (QuestionType::MultipleChoiceSingle, Self::Choice(id)) => {
                if question.choice_list().is_empty() || question.has_choice(id) {
                    Ok(())
                } else {
                    Err(format!("unknown choice '{id}'"))
                }
            }
            (QuestionType::MultipleChoiceMulti, Self::Choices(ids)) => {
                if ids.is_empty() {
                    return Err("no choices selected".to_string());
                }
                let mut seen = HashSet::with_capacity(ids.len());
                for id in ids {
                    if !seen.insert(id.as_str()) {
                        return Err(format!("choice '{id}' selected twice"));
                    }
                    if !question.choice_list().is_empty() && !question.has_choice(id) {
                        return Err(format!("unknown choice '{id}'"));
                    }
                }
                Ok(())
            }
            (
                QuestionType::OpenText | QuestionType::Cta | QuestionType::Consent,
                Self::Text(_),
            ) => Ok(()),
            (question_type, value) => Err(format!(
                "{} is not a valid answer shape for {question_type}",
                value.shape()
            )),
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            Self::Score(_) => "a number",
            Self::Choice(_) => "a choice id",
            Self::Choices(_) => "a list",
            Self::Text(_) => "a string",
        }
    }
}

impl From<&AnswerValue> for serde_json::Value {
    fn from(value: &AnswerValue) -> Self {
        match value {
            AnswerValue::Score(v) => serde_json::Value::from(*v),
            AnswerValue::Choices(ids) => serde_json::Value::from(ids.clone()),
            AnswerValue::Choice(s) | AnswerValue::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

/// Answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: AnswerValue) -> Self {
        Self {
            question_id: question_id.into(),
            value,
        }
    }
}

fn default_finished() -> bool {
    true
}

/// One user's response to one survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Local survey id
    pub survey_id: String,

    /// Email of the responding user
    pub user_email: String,

    /// One answer per answered question, in question order
    pub answers: Vec<Answer>,

    #[serde(default = "default_finished")]
    pub finished: bool,
}

impl Response {
    /// Collapse answers into a question id -> value map.
    ///
    /// A repeated question id keeps the last value.
    pub fn answer_data(&self) -> serde_json::Map<String, serde_json::Value> {
        self.answers
            .iter()
            .map(|a| (a.question_id.clone(), serde_json::Value::from(&a.value)))
            .collect()
    }
}

/// A response (or one of its answers) that does not line up with the surveys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Index of the response in its list
    pub response_index: usize,
    pub survey_id: String,
    /// Set when the problem is with a single answer
    pub question_id: Option<String>,
    pub reason: String,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.question_id {
            Some(q) => write!(
                f,
                "response #{} (survey '{}', question '{}'): {}",
                self.response_index, self.survey_id, q, self.reason
            ),
            None => write!(
                f,
                "response #{} (survey '{}'): {}",
                self.response_index, self.survey_id, self.reason
            ),
        }
    }
}

/// Collection of responses in generation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseList {
    pub responses: Vec<Response>,
}

impl ResponseList {
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Responses submitted for one survey.
    pub fn for_survey<'a>(&'a self, survey_id: &'a str) -> impl Iterator<Item = &'a Response> {
        self.responses.iter().filter(move |r| r.survey_id == survey_id)
    }

    /// Re-key every answer by its question's type.
    ///
    /// Answers to unknown surveys or questions are left as read.
    pub fn key_by_question_type(&mut self, surveys: &SurveyList) {
        for response in &mut self.responses {
            let Some(survey) = surveys.get(&response.survey_id) else {
                continue;
            };
            for answer in &mut response.answers {
                if let Some(question) = survey.question(&answer.question_id) {
                    let value = std::mem::replace(&mut answer.value, AnswerValue::Score(0));
                    answer.value = value.for_question(question.question_type);
                }
            }
        }
    }

    /// Cross-check every response against `surveys`.
    ///
    /// Reports unknown surveys, unknown or repeated question ids, unanswered
    /// questions and values outside their question type's domain.
    pub fn dangling_references(&self, surveys: &SurveyList) -> Vec<DanglingReference> {
        let mut problems = Vec::new();

        for (index, response) in self.responses.iter().enumerate() {
            let problem = |question_id: Option<&str>, reason: String| DanglingReference {
                response_index: index,
                survey_id: response.survey_id.clone(),
                question_id: question_id.map(str::to_string),
                reason,
            };

            let Some(survey) = surveys.get(&response.survey_id) else {
                problems.push(problem(None, "unknown survey".to_string()));
                continue;
            };

            let mut answered = HashSet::with_capacity(response.answers.len());
            for answer in &response.answers {
                let qid = answer.question_id.as_str();
                let Some(question) = survey.question(qid) else {
                    problems.push(problem(Some(qid), "unknown question".to_string()));
                    continue;
                };
                if !answered.insert(qid) {
                    problems.push(problem(Some(qid), "answered more than once".to_string()));
                }
                if let Err(reason) = answer.value.conforms_to(question) {
                    problems.push(problem(Some(qid), reason));
                }
            }

            for question in &survey.questions {
                if !answered.contains(question.id.as_str()) {
                    problems.push(problem(Some(question.id.as_str()), "not answered".to_string()));
                }
            }
        }

        problems
    }
}

impl Validate for ResponseList {
    fn validate(&self) -> Result<(), ModelError> {
        for (index, response) in self.responses.iter().enumerate() {
            if response.survey_id.trim().is_empty() {
                return Err(ModelError::invalid(
                    format!("response #{index}"),
                    "survey_id must not be empty",
                ));
            }
            if response.answers.iter().any(|a| a.question_id.trim().is_empty()) {
                return Err(ModelError::invalid(
                    format!("response #{index}"),
                    "question_id must not be empty",
                ));
            }
        }
        Ok(())
    }
}
