use crate::error::QuestionError;
use crate::models::{
    QuestionCreate, QuestionUpdate, check_index, check_max_score, check_text, resolve_key,
};
use crate::repository::{NewQuestion, QuestionChanges, QuestionRepository};
use mcq_database::entities::question;
use mcq_database::json;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct QuestionService {
    questions: QuestionRepository,
    min_options: usize,
    default_max_score: f64,
}

impl QuestionService {
    #[must_use]
    pub const fn new(questions: QuestionRepository, min_options: usize, default_max_score: f64) -> Self {
        Self { questions, min_options, default_max_score }
    }

    async fn ensure_paper(&self, test_paper_id: i32) -> Result<(), QuestionError> {
        if self.questions.paper_exists(test_paper_id).await? {
            Ok(())
        } else {
            Err(QuestionError::PaperNotFound { test_paper_id })
        }
    }

    #[instrument(skip_all, fields(test_paper_id = body.test_paper_id))]
    pub async fn create(&self, body: QuestionCreate) -> Result<question::Model, QuestionError> {
        let text = check_text(&body.text)?;
        let key = resolve_key(&body.options, body.correct_option_index, None, self.min_options)?;
        let max_score = check_max_score(body.max_score.unwrap_or(self.default_max_score))?;
        self.ensure_paper(body.test_paper_id).await?;

        let question = self
            .questions
            .insert(NewQuestion { text, test_paper_id: body.test_paper_id, key, max_score })
            .await?;
        info!(question_id = question.id, "Question created");
        Ok(question)
    }

    pub async fn list(&self, test_paper_id: Option<i32>) -> Result<Vec<question::Model>, QuestionError> {
        self.questions.find_all(test_paper_id).await
    }

    pub async fn get(&self, id: i32) -> Result<question::Model, QuestionError> {
        self.questions.find_by_id(id).await?.ok_or(QuestionError::NotFound { id })
    }

    /// Applies the present fields; new options without a marked answer keep the stored index.
    #[instrument(skip_all, fields(question_id = id))]
    pub async fn update(&self, id: i32, body: QuestionUpdate) -> Result<question::Model, QuestionError> {
        let existing = self.get(id).await?;

        let mut changes = QuestionChanges {
            text: body.text.as_deref().map(check_text).transpose()?,
            max_score: body.max_score.map(check_max_score).transpose()?,
            ..QuestionChanges::default()
        };
        if let Some(options) = &body.options {
            let fallback = Some(existing.correct_option_index);
            changes.key = Some(resolve_key(options, body.correct_option_index, fallback, self.min_options)?);
        } else if let Some(index) = body.correct_option_index {
            check_index(index, json::string_list(&existing.options).len())?;
            changes.correct_index = Some(index);
        }
        if let Some(paper) = body.test_paper_id {
            if paper != existing.test_paper_id {
                self.ensure_paper(paper).await?;
                changes.test_paper_id = Some(paper);
            }
        }

        let question = self.questions.update(existing, changes).await?;
        info!("Question updated");
        Ok(question)
    }

    #[instrument(skip_all, fields(question_id = id))]
    pub async fn delete(&self, id: i32) -> Result<(), QuestionError> {
        if !self.questions.delete(id).await? {
            return Err(QuestionError::NotFound { id });
        }
        info!("Question deleted");
        Ok(())
    }
}
