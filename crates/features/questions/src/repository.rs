use crate::error::QuestionError;
use crate::models::AnswerKey;
use chrono::Utc;
use mcq_database::entities::{Question, TestPaper, question};
use mcq_database::sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use mcq_database::{Database, DatabaseError};

#[derive(Debug)]
pub struct NewQuestion {
    pub text: String,
    pub test_paper_id: i32,
    pub key: AnswerKey,
    pub max_score: f64,
}

#[derive(Debug, Default)]
pub struct QuestionChanges {
    pub text: Option<String>,
    pub test_paper_id: Option<i32>,
    pub key: Option<AnswerKey>,
    pub correct_index: Option<i32>,
    pub max_score: Option<f64>,
}

/// `questions` table access.
#[derive(Debug, Clone)]
pub struct QuestionRepository {
    db: Database,
}

fn storage(err: DbErr, context: &'static str) -> QuestionError {
    DatabaseError::from_orm(err, context).into()
}

impl QuestionRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<&DatabaseConnection, QuestionError> {
        Ok(self.db.connection()?)
    }

    pub async fn find_all(&self, test_paper_id: Option<i32>) -> Result<Vec<question::Model>, QuestionError> {
        let mut select = Question::find().order_by_asc(question::Column::Id);
        if let Some(paper) = test_paper_id {
            select = select.filter(question::Column::TestPaperId.eq(paper));
        }
        select.all(self.conn()?).await.map_err(|e| storage(e, "Listing questions"))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<question::Model>, QuestionError> {
        Question::find_by_id(id).one(self.conn()?).await.map_err(|e| storage(e, "Loading question"))
    }

    pub async fn paper_exists(&self, test_paper_id: i32) -> Result<bool, QuestionError> {
        let paper = TestPaper::find_by_id(test_paper_id)
            .one(self.conn()?)
            .await
            .map_err(|e| storage(e, "Loading test paper"))?;
        Ok(paper.is_some())
    }

    pub async fn insert(&self, new: NewQuestion) -> Result<question::Model, QuestionError> {
        let now = Utc::now();
        question::ActiveModel {
            question_text: Set(new.text),
            max_score: Set(new.max_score),
            options: Set(new.key.options_json()),
            correct_option_index: Set(new.key.correct_index),
            test_paper_id: Set(new.test_paper_id),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(self.conn()?)
        .await
        .map_err(|e| storage(e, "Creating question"))
    }

    pub async fn update(
        &self,
        existing: question::Model,
        changes: QuestionChanges,
    ) -> Result<question::Model, QuestionError> {
        let mut model: question::ActiveModel = existing.into();
        if let Some(text) = changes.text {
            model.question_text = Set(text);
        }
        if let Some(paper) = changes.test_paper_id {
            model.test_paper_id = Set(paper);
        }
        if let Some(key) = changes.key {
            model.options = Set(key.options_json());
            model.correct_option_index = Set(key.correct_index);
        } else if let Some(index) = changes.correct_index {
            model.correct_option_index = Set(index);
        }
        if let Some(score) = changes.max_score {
            model.max_score = Set(score);
        }
        model.updated_at = Set(Some(Utc::now()));

        model.update(self.conn()?).await.map_err(|e| storage(e, "Updating question"))
    }

    /// Returns `false` when no row had that id.
    pub async fn delete(&self, id: i32) -> Result<bool, QuestionError> {
        let outcome = Question::delete_by_id(id)
            .exec(self.conn()?)
            .await
            .map_err(|e| storage(e, "Deleting question"))?;
        Ok(outcome.rows_affected > 0)
    }
}
