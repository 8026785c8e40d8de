//! Bodies of the `/questions` routes and the answer-key rules they are checked against.

use crate::error::QuestionError;
use chrono::{DateTime, Utc};
use mcq_database::entities::question;
use mcq_database::json;
use mcq_derive::api_model;
use serde_json::Value;

#[api_model]
pub struct OptionInput {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[api_model]
pub struct QuestionCreate {
    pub text: String,
    pub test_paper_id: i32,
    pub options: Vec<OptionInput>,
    /// 0-based; overrides the `is_correct` flags
    pub correct_option_index: Option<i32>,
    /// Defaults to `quiz.default_max_score`
    pub max_score: Option<f64>,
}

#[api_model]
pub struct QuestionUpdate {
    pub text: Option<String>,
    pub test_paper_id: Option<i32>,
    pub options: Option<Vec<OptionInput>>,
    pub correct_option_index: Option<i32>,
    pub max_score: Option<f64>,
}

#[api_model(deny_unknown_fields = false)]
pub struct QuestionFilter {
    pub test_paper_id: Option<i32>,
}

#[api_model]
pub struct OptionOutput {
    /// 1-based position
    pub id: i32,
    pub text: String,
}

#[api_model]
pub struct QuestionResponse {
    pub id: i32,
    pub text: String,
    pub test_paper_id: i32,
    pub options: Vec<OptionOutput>,
    /// `correct_option_index + 1`, absent when the stored index is out of range
    pub correct_option_id: Option<i32>,
    pub max_score: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<question::Model> for QuestionResponse {
    fn from(question: question::Model) -> Self {
        let texts = json::string_list(&question.options);
        let correct_option_id = usize::try_from(question.correct_option_index)
            .ok()
            .filter(|index| *index < texts.len())
            .and_then(|index| i32::try_from(index + 1).ok());
        let options = texts
            .into_iter()
            .zip(1..)
            .map(|(text, id)| OptionOutput { id, text })
            .collect();

        Self {
            id: question.id,
            text: question.question_text,
            test_paper_id: question.test_paper_id,
            options,
            correct_option_id,
            max_score: question.max_score,
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}

/// Validated options with the index of the correct one.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerKey {
    pub texts: Vec<String>,
    pub correct_index: i32,
}

impl AnswerKey {
    /// The stored shape: `[{"text": ...}, ...]`.
    pub(crate) fn options_json(&self) -> Value {
        Value::Array(self.texts.iter().map(|text| serde_json::json!({ "text": text })).collect())
    }
}

/// Picks the correct option: the explicit index, else the last flagged option, else `fallback`.
pub(crate) fn resolve_key(
    options: &[OptionInput],
    explicit: Option<i32>,
    fallback: Option<i32>,
    min_options: usize,
) -> Result<AnswerKey, QuestionError> {
    if options.len() < min_options {
        return Err(QuestionError::validation(format!("at least {min_options} options are required")));
    }
    if options.iter().any(|option| option.text.trim().is_empty()) {
        return Err(QuestionError::validation("option text must not be empty"));
    }

    let flagged = options
        .iter()
        .rposition(|option| option.is_correct)
        .and_then(|index| i32::try_from(index).ok());
    let Some(correct_index) = explicit.or(flagged).or(fallback) else {
        return Err(QuestionError::validation("a correct option must be marked"));
    };
    check_index(correct_index, options.len())?;

    let texts = options.iter().map(|option| option.text.trim().to_owned()).collect();
    Ok(AnswerKey { texts, correct_index })
}

pub(crate) fn check_index(index: i32, option_count: usize) -> Result<(), QuestionError> {
    let in_range = usize::try_from(index).is_ok_and(|index| index < option_count);
    if in_range {
        Ok(())
    } else {
        Err(QuestionError::validation("correct_option_index is out of range"))
    }
}

pub(crate) fn check_text(text: &str) -> Result<String, QuestionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(QuestionError::validation("text must not be empty"));
    }
    Ok(text.to_owned())
}

pub(crate) fn check_max_score(score: f64) -> Result<f64, QuestionError> {
    if score.is_finite() && score > 0.0 {
        Ok(score)
    } else {
        Err(QuestionError::validation("max_score must be greater than 0"))
    }
}
