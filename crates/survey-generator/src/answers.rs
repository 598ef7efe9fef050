//! Answer synthesis for generated responses.
//!
//! Answers are drawn locally from the question definition; no model call is
//! involved, which keeps response generation fast and reproducible for a
//! given seed.

use rand::seq::SliceRandom;
use rand::Rng;
use survey_model::response::NPS_MAX;
use survey_model::{AnswerValue, Question, QuestionType};

/// Choice id used when a choice question arrives without choices.
pub const FALLBACK_CHOICE_ID: &str = "choice-1";

/// Answer given to question types without a dedicated rule.
pub const DEFAULT_ANSWER: &str = "Yes";

/// Most choices selected for a multi-select question.
pub const MAX_MULTI_SELECTIONS: usize = 3;

/// Pool of plausible free-text answers.
pub const OPEN_TEXT_ANSWERS: [&str; 10] = [
    "The product works well overall, but could use some improvements in the UI.",
    "Very satisfied with the service. Support team is responsive and helpful.",
    "It meets our needs, though the learning curve was steep initially.",
    "Great tool! Has saved us a lot of time in our workflow.",
    "Works as expected. Would appreciate more integration options.",
    "Solid product. The recent updates have been particularly useful.",
    "Good value for money. Some features could be more intuitive.",
    "Excellent experience so far. Looking forward to upcoming features.",
    "It's okay. Does the job but nothing exceptional.",
    "Really impressed with the performance and reliability.",
];

/// Generate an answer for `question` according to its type.
pub fn answer_for_question<R: Rng>(rng: &mut R, question: &Question) -> AnswerValue {
    match question.question_type {
        QuestionType::Rating => {
            AnswerValue::Score(rng.gen_range(1..=i64::from(question.rating_range())))
        }
        QuestionType::Nps => AnswerValue::Score(rng.gen_range(0..=NPS_MAX)),
        QuestionType::MultipleChoiceSingle => {
            let id = question
                .choice_list()
                .choose(rng)
                .map(|c| c.id.clone())
                .unwrap_or_else(|| FALLBACK_CHOICE_ID.to_string());
            AnswerValue::Choice(id)
        }
        QuestionType::MultipleChoiceMulti => {
            let choices = question.choice_list();
            if choices.is_empty() {
                return AnswerValue::Choices(vec![FALLBACK_CHOICE_ID.to_string()]);
            }
            let count = rng.gen_range(1..=choices.len().min(MAX_MULTI_SELECTIONS));
            AnswerValue::Choices(
                choices
                    .choose_multiple(rng, count)
                    .map(|c| c.id.clone())
                    .collect(),
            )
        }
        QuestionType::OpenText => {
            // Pool is non-empty; `choose` only returns None for empty slices.
            let text = OPEN_TEXT_ANSWERS
                .choose(rng)
                .copied()
                .unwrap_or(DEFAULT_ANSWER);
            AnswerValue::Text(text.to_string())
        }
        QuestionType::Cta | QuestionType::Consent => AnswerValue::Text(DEFAULT_ANSWER.to_string()),
    }
}
