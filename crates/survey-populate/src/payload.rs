//! Request bodies sent to the platform.

use serde::Serialize;
use serde_json::{json, Map, Value};
use survey_model::{Question, QuestionChoice, Response, Survey, User};

/// Body of a member creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberPayload {
    pub email: String,
    pub name: String,
    pub role: String,
}

impl MemberPayload {
    pub fn from_user(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// One question inside a [`SurveyPayload`].
///
/// Optional fields are only sent when they carry a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub headline: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<QuestionChoice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_label: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl QuestionPayload {
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            question_type: question.question_type.as_str().to_string(),
            headline: question.headline.clone(),
            required: question.required,
            subheader: non_empty(&question.subheader),
            choices: question.choices.clone().filter(|c| !c.is_empty()),
            scale: non_empty(&question.scale),
            range: question.range.filter(|r| *r > 0),
            lower_label: non_empty(&question.lower_label),
            upper_label: non_empty(&question.upper_label),
        }
    }
}

/// Body of a survey creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub survey_type: String,
    pub status: String,
    pub questions: Vec<QuestionPayload>,
    pub welcome_card: Value,
    pub thank_you_card: Value,
}

/// Welcome card sent when the survey has none.
pub fn default_welcome_card() -> Value {
    json!({ "enabled": false })
}

/// Thank-you card sent when the survey has none.
pub fn default_thank_you_card() -> Value {
    json!({
        "enabled": true,
        "headline": "Thank you!",
        "subheader": "We appreciate your feedback."
    })
}

impl SurveyPayload {
    pub fn from_survey(survey: &Survey) -> Self {
        Self {
            name: survey.name.clone(),
            survey_type: survey.survey_type.clone(),
            status: survey.status.clone(),
            questions: survey
                .questions
                .iter()
                .map(QuestionPayload::from_question)
                .collect(),
            welcome_card: card_or(survey.welcome_card.as_ref(), default_welcome_card),
            thank_you_card: card_or(survey.thank_you_card.as_ref(), default_thank_you_card),
        }
    }
}

/// Null and empty-object cards count as absent.
fn card_or(card: Option<&Value>, default: fn() -> Value) -> Value {
    match card {
        None | Some(Value::Null) => default(),
        Some(Value::Object(fields)) if fields.is_empty() => default(),
        Some(card) => card.clone(),
    }
}

/// Body of a response submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    /// Remote survey id
    pub survey_id: String,
    pub finished: bool,
    /// Question id to answer value
    pub data: Map<String, Value>,
}

impl ResponsePayload {
    pub fn new(response: &Response, survey_id: impl Into<String>) -> Self {
        Self {
            survey_id: survey_id.into(),
            finished: response.finished,
            data: response.answer_data(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_model::{Answer, AnswerValue, QuestionType, UserRole};

    #[test]
    fn test_member_payload() {
        let user = User::new("Ada Lovelace", "ada@company.com", UserRole::Manager);
        let value = serde_json::to_value(MemberPayload::from_user(&user)).unwrap();
        assert_eq!(
            value,
            json!({"email": "ada@company.com", "name": "Ada Lovelace", "role": "manager"})
        );
    }

    #[test]
    fn test_question_payload_omits_empty_fields() {
        let mut question = Question::new("q1", QuestionType::OpenText, "Anything else?");
        question.subheader = Some(String::new());
        question.choices = Some(Vec::new());
        question.range = Some(0);

        let value = serde_json::to_value(QuestionPayload::from_question(&question)).unwrap();
        assert_eq!(
            value,
            json!({"id": "q1", "type": "openText", "headline": "Anything else?", "required": true})
        );
    }

    #[test]
    fn test_question_payload_keeps_rating_fields() {
        let mut question = Question::new("q1", QuestionType::Rating, "How satisfied?").with_range(5);
        question.scale = Some("number".to_string());
        question.lower_label = Some("Not satisfied".to_string());
        question.upper_label = Some("Very satisfied".to_string());

        let value = serde_json::to_value(QuestionPayload::from_question(&question)).unwrap();
        assert_eq!(value["range"], 5);
        assert_eq!(value["scale"], "number");
        assert_eq!(value["lowerLabel"], "Not satisfied");
        assert_eq!(value["upperLabel"], "Very satisfied");
    }

    #[test]
    fn test_survey_payload_default_cards() {
        let survey = Survey::new(
            "s1",
            "Onboarding",
            vec![Question::new("q1", QuestionType::MultipleChoiceSingle, "Plan?")
                .with_choices(vec![QuestionChoice::new("choice-1", "Free")])],
        );

        let value = serde_json::to_value(SurveyPayload::from_survey(&survey)).unwrap();
        assert_eq!(value["name"], "Onboarding");
        assert_eq!(value["type"], "link");
        assert_eq!(value["status"], "draft");
        assert_eq!(value["welcomeCard"], json!({"enabled": false}));
        assert_eq!(value["thankYouCard"]["headline"], "Thank you!");
        assert_eq!(
            value["questions"][0]["choices"],
            json!([{"id": "choice-1", "label": "Free"}])
        );
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_survey_payload_keeps_custom_cards() {
        let mut survey = Survey::new("s1", "Exit", vec![]);
        survey.welcome_card = Some(json!({"enabled": true, "headline": "Hi"}));

        let payload = SurveyPayload::from_survey(&survey);
        assert_eq!(payload.welcome_card["headline"], "Hi");
        assert_eq!(payload.thank_you_card, default_thank_you_card());
    }

    #[test]
    fn test_survey_payload_empty_cards_use_defaults() {
        let mut survey = Survey::new("s1", "Exit", vec![]);
        survey.welcome_card = Some(json!({}));
        survey.thank_you_card = Some(Value::Null);

        let payload = SurveyPayload::from_survey(&survey);
        assert_eq!(payload.welcome_card, json!({"enabled": false}));
        assert_eq!(payload.thank_you_card, default_thank_you_card());
    }

    #[test]
    fn test_response_payload() {
        let response = Response {
            survey_id: "local-1".to_string(),
            user_email: "ada@company.com".to_string(),
            answers: vec![
                Answer::new("q1", AnswerValue::Score(4)),
                Answer::new("q2", AnswerValue::Choices(vec!["a".into(), "b".into()])),
            ],
            finished: true,
        };

        let value = serde_json::to_value(ResponsePayload::new(&response, "remote-9")).unwrap();
        assert_eq!(
            value,
            json!({"surveyId": "remote-9", "finished": true, "data": {"q1": 4, "q2": ["a", "b"]}})
        );
    }
}
