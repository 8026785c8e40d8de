use crate::error::ResultsError;
use crate::repository::{NewResult, ResultRepository};
use crate::scoring::{self, KeyEntry, Score};
use mcq_database::entities::result;
use mcq_kernel::security::CurrentUser;
use serde_json::Value;
use tracing::{info, instrument};

const SUBMIT_DENIED: &str = "You can only submit tests for your own user account";
const VIEW_DENIED: &str = "You can only view your own results";

/// Submission, scoring and retrieval of results.
#[derive(Debug, Clone)]
pub struct ResultsService {
    results: ResultRepository,
    max_answers: usize,
}

impl ResultsService {
    #[must_use]
    pub const fn new(results: ResultRepository, max_answers: usize) -> Self {
        Self { results, max_answers }
    }

    /// Scores `body` against the paper's questions and stores the outcome for `user_id`.
    #[instrument(skip_all, fields(user_id = user_id, test_paper_id = test_paper_id))]
    pub async fn submit(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        test_paper_id: i32,
        body: Value,
    ) -> Result<(result::Model, Score), ResultsError> {
        if !caller.can_access(user_id) {
            return Err(ResultsError::forbidden(SUBMIT_DENIED));
        }
        let answers = scoring::normalize_answers(body)?;
        if answers.len() > self.max_answers {
            return Err(ResultsError::validation(format!(
                "Too many answers: at most {} per submission",
                self.max_answers
            )));
        }

        if !self.results.paper_exists(test_paper_id).await? {
            return Err(ResultsError::PaperNotFound { test_paper_id });
        }
        let questions = self.results.questions_of(test_paper_id).await?;
        if questions.is_empty() {
            return Err(ResultsError::EmptyPaper { test_paper_id });
        }

        let key: Vec<KeyEntry> = questions.iter().map(KeyEntry::from).collect();
        let score = scoring::score(&key, &answers);
        let stored = self
            .results
            .insert(NewResult { user_id, test_paper_id, final_score: score.final_score, answers })
            .await?;

        info!(
            result_id = stored.id,
            final_score = score.final_score,
            max_score = score.max_possible_score,
            correct = score.correct_count,
            answered = score.answered_count,
            "Submission scored"
        );
        Ok((stored, score))
    }

    /// Loads a result for its owner or an admin; unknown ids are reported before access.
    pub async fn get(&self, caller: &CurrentUser, id: i32) -> Result<result::Model, ResultsError> {
        let result = self.results.find_by_id(id).await?.ok_or(ResultsError::NotFound { id })?;
        if !caller.can_access(result.user_id) {
            return Err(ResultsError::forbidden(VIEW_DENIED));
        }
        Ok(result)
    }

    pub async fn for_user(&self, user_id: i32) -> Result<Vec<result::Model>, ResultsError> {
        self.results.find_by_user(user_id).await
    }

    pub async fn for_paper(&self, test_paper_id: i32) -> Result<Vec<result::Model>, ResultsError> {
        self.results.find_by_paper(test_paper_id).await
    }

    #[instrument(skip_all, fields(result_id = id))]
    pub async fn delete(&self, id: i32) -> Result<(), ResultsError> {
        if !self.results.delete(id).await? {
            return Err(ResultsError::NotFound { id });
        }
        info!("Result deleted");
        Ok(())
    }
}
