//! Pure scoring of an answer sheet against a paper's answer key.
//!
//! Answers map a question id, as a string, to the chosen 0-based option index.

use crate::error::ResultsError;
use mcq_database::entities::question;
use mcq_database::json;
use serde_json::{Map, Value};

const NESTED_KEY: &str = "user_answers";

/// What the engine needs to know about one question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEntry {
    pub question_id: i32,
    pub correct_option_index: i32,
    pub max_score: f64,
}

impl From<&question::Model> for KeyEntry {
    fn from(question: &question::Model) -> Self {
        Self {
            question_id: question.id,
            correct_option_index: question.correct_option_index,
            max_score: question.max_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub final_score: f64,
    pub max_possible_score: f64,
    /// 0 when the paper is worth nothing.
    pub percentage: f64,
    pub correct_count: usize,
    pub answered_count: usize,
}

/// Extracts the answer map from a submission body, flat or nested under `"user_answers"`.
///
/// Legacy clients send the map JSON-encoded as a string; it is decoded first.
///
/// # Errors
/// [`ResultsError::Validation`] when no object can be found.
pub fn normalize_answers(body: Value) -> Result<Map<String, Value>, ResultsError> {
    match json::normalize(body) {
        Value::Object(mut outer) => match outer.remove(NESTED_KEY).map(json::normalize) {
            Some(Value::Object(inner)) => Ok(inner),
            Some(Value::Null) | None => Ok(outer),
            Some(_) => Err(answers_not_an_object()),
        },
        _ => Err(answers_not_an_object()),
    }
}

fn answers_not_an_object() -> ResultsError {
    ResultsError::validation("user_answers must be an object mapping question ids to option indexes")
}

/// Only an integer equal to the stored index earns the question's score.
fn is_correct(answer: &Value, correct_option_index: i32) -> bool {
    answer.as_i64() == Some(i64::from(correct_option_index))
}

#[must_use]
pub fn score(key: &[KeyEntry], answers: &Map<String, Value>) -> Score {
    let mut final_score = 0.0;
    let mut max_possible_score = 0.0;
    let mut correct_count = 0;
    let mut answered_count = 0;

    for entry in key {
        max_possible_score += entry.max_score;
        let Some(answer) = answers.get(&entry.question_id.to_string()) else {
            continue;
        };
        if answer.is_null() {
            continue;
        }
        answered_count += 1;
        if is_correct(answer, entry.correct_option_index) {
            final_score += entry.max_score;
            correct_count += 1;
        }
    }

    let percentage = if max_possible_score > 0.0 { final_score / max_possible_score * 100.0 } else { 0.0 };
    Score { final_score, max_possible_score, percentage, correct_count, answered_count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key() -> Vec<KeyEntry> {
        vec![
            KeyEntry { question_id: 1, correct_option_index: 0, max_score: 1.0 },
            KeyEntry { question_id: 2, correct_option_index: 2, max_score: 2.0 },
            KeyEntry { question_id: 3, correct_option_index: 1, max_score: 1.0 },
        ]
    }

    fn answers(value: Value) -> Map<String, Value> {
        normalize_answers(value).unwrap()
    }

    #[test]
    fn test_scores_correct_answers_only() {
        let score = score(&key(), &answers(json!({"1": 0, "2": 1, "3": 1})));
        assert!((score.final_score - 2.0).abs() < f64::EPSILON);
        assert!((score.max_possible_score - 4.0).abs() < f64::EPSILON);
        assert!((score.percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(score.correct_count, 2);
        assert_eq!(score.answered_count, 3);
    }

    #[test]
    fn test_non_integer_answers_score_nothing() {
        let score = score(&key(), &answers(json!({"1": "0", "2": 2.5, "3": true})));
        assert!(score.final_score.abs() < f64::EPSILON);
        assert_eq!(score.answered_count, 3);
    }

    #[test]
    fn test_float_and_bool_lookalikes_do_not_match() {
        // Loose equality would take `1.0` and `true` for index 1; only JSON integers score.
        let lookalikes = score(&key(), &answers(json!({"1": 0.0, "3": true})));
        assert!(lookalikes.final_score.abs() < f64::EPSILON);
        assert_eq!(lookalikes.correct_count, 0);

        let float = score(&key(), &answers(json!({"3": 1.0})));
        assert_eq!(float.correct_count, 0);
        assert_eq!(float.answered_count, 1);
    }

    #[test]
    fn test_unknown_and_null_answers_are_ignored() {
        let score = score(&key(), &answers(json!({"2": 2, "3": null, "99": 0})));
        assert!((score.final_score - 2.0).abs() < f64::EPSILON);
        assert_eq!(score.answered_count, 1);
    }

    #[test]
    fn test_nested_and_encoded_sheets() {
        assert_eq!(answers(json!({"user_answers": {"1": 0}})), answers(json!({"1": 0})));
        assert_eq!(answers(json!({"user_answers": "{\"1\": 0}"})), answers(json!({"1": 0})));
        assert_eq!(answers(Value::String("{\"2\": 1}".into())), answers(json!({"2": 1})));
    }

    #[test]
    fn test_sheet_must_be_an_object() {
        for body in [json!([0, 1]), json!(3), json!({"user_answers": [1]})] {
            let err = normalize_answers(body).unwrap_err();
            assert_eq!(err.status(), 422);
        }
    }

    #[test]
    fn test_worthless_paper_has_zero_percentage() {
        let key = [KeyEntry { question_id: 1, correct_option_index: 0, max_score: 0.0 }];
        let score = score(&key, &answers(json!({"1": 0})));
        assert!(score.percentage.abs() < f64::EPSILON);
    }
}
