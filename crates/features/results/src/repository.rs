use crate::error::ResultsError;
use chrono::Utc;
use mcq_database::entities::{Question, QuizResult, TestPaper, question, result};
use mcq_database::sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use mcq_database::{Database, DatabaseError};
use serde_json::{Map, Value};

#[derive(Debug)]
pub struct NewResult {
    pub user_id: i32,
    pub test_paper_id: i32,
    pub final_score: f64,
    pub answers: Map<String, Value>,
}

/// `results` table access, plus the reads of papers and questions a submission needs.
#[derive(Debug, Clone)]
pub struct ResultRepository {
    db: Database,
}

fn storage(err: DbErr, context: &'static str) -> ResultsError {
    DatabaseError::from_orm(err, context).into()
}

impl ResultRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<&DatabaseConnection, ResultsError> {
        Ok(self.db.connection()?)
    }

    pub async fn paper_exists(&self, test_paper_id: i32) -> Result<bool, ResultsError> {
        let paper = TestPaper::find_by_id(test_paper_id)
            .one(self.conn()?)
            .await
            .map_err(|e| storage(e, "Loading test paper"))?;
        Ok(paper.is_some())
    }

    pub async fn questions_of(&self, test_paper_id: i32) -> Result<Vec<question::Model>, ResultsError> {
        Question::find()
            .filter(question::Column::TestPaperId.eq(test_paper_id))
            .order_by_asc(question::Column::Id)
            .all(self.conn()?)
            .await
            .map_err(|e| storage(e, "Loading answer key"))
    }

    pub async fn insert(&self, new: NewResult) -> Result<result::Model, ResultsError> {
        let (user_id, test_paper_id) = (new.user_id, new.test_paper_id);
        let model = result::ActiveModel {
            user_id: Set(user_id),
            test_paper_id: Set(test_paper_id),
            final_score: Set(new.final_score),
            user_answers: Set(Some(Value::Object(new.answers))),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        };

        match model.insert(self.conn()?).await {
            Ok(result) => Ok(result),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) => {
                Err(ResultsError::MissingReference { user_id, test_paper_id })
            },
            Err(e) => Err(storage(e, "Saving result")),
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<result::Model>, ResultsError> {
        QuizResult::find_by_id(id).one(self.conn()?).await.map_err(|e| storage(e, "Loading result"))
    }

    pub async fn find_by_user(&self, user_id: i32) -> Result<Vec<result::Model>, ResultsError> {
        QuizResult::find()
            .filter(result::Column::UserId.eq(user_id))
            .order_by_desc(result::Column::Id)
            .all(self.conn()?)
            .await
            .map_err(|e| storage(e, "Listing results of user"))
    }

    pub async fn find_by_paper(&self, test_paper_id: i32) -> Result<Vec<result::Model>, ResultsError> {
        QuizResult::find()
            .filter(result::Column::TestPaperId.eq(test_paper_id))
            .order_by_desc(result::Column::Id)
            .all(self.conn()?)
            .await
            .map_err(|e| storage(e, "Listing results of test paper"))
    }

    /// Returns `false` when no row had that id.
    pub async fn delete(&self, id: i32) -> Result<bool, ResultsError> {
        let outcome = QuizResult::delete_by_id(id)
            .exec(self.conn()?)
            .await
            .map_err(|e| storage(e, "Deleting result"))?;
        Ok(outcome.rows_affected > 0)
    }
}
