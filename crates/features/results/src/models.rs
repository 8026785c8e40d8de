//! Bodies of the `/results` and `/test-papers/{id}/submit` routes.

use crate::scoring::Score;
use chrono::{DateTime, Utc};
use mcq_database::entities::result;
use mcq_database::json;
use mcq_derive::api_model;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// A submission on behalf of `user_id`.
#[api_model]
pub struct SubmitRequest {
    pub user_id: i32,
    pub test_paper_id: i32,
    /// Question id to 0-based option index
    #[schema(value_type = Object)]
    pub user_answers: Value,
}

/// Question id to 0-based option index, either flat or nested under `user_answers`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct AnswerSheet(pub Value);

#[api_model]
pub struct ResultResponse {
    pub id: i32,
    pub user_id: i32,
    pub test_paper_id: i32,
    pub final_score: f64,
    #[schema(value_type = Option<Object>)]
    pub user_answers: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A stored result together with what it was out of.
#[api_model]
pub struct SubmissionResponse {
    pub id: i32,
    pub user_id: i32,
    pub test_paper_id: i32,
    pub final_score: f64,
    pub max_score: f64,
    pub percentage: f64,
    #[schema(value_type = Option<Object>)]
    pub user_answers: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<result::Model> for ResultResponse {
    fn from(result: result::Model) -> Self {
        Self {
            id: result.id,
            user_id: result.user_id,
            test_paper_id: result.test_paper_id,
            final_score: result.final_score,
            user_answers: result.user_answers.map(json::normalize),
            created_at: result.created_at,
        }
    }
}

impl SubmissionResponse {
    #[must_use]
    pub fn new(result: result::Model, score: &Score) -> Self {
        let ResultResponse { id, user_id, test_paper_id, final_score, user_answers, created_at } =
            result.into();
        Self {
            id,
            user_id,
            test_paper_id,
            final_score,
            max_score: score.max_possible_score,
            percentage: score.percentage,
            user_answers,
            created_at,
        }
    }
}
