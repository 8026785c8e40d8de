use crate::error::TestPaperError;
use chrono::Utc;
use mcq_database::entities::{Question, TestPaper, question, test_paper};
use mcq_database::sea_orm::sea_query::Expr;
use mcq_database::sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use mcq_database::{Database, DatabaseError};
use fxhash::FxHashMap;

#[derive(Debug)]
pub struct NewPaper {
    pub name: String,
    pub duration_minutes: i32,
    pub is_active: bool,
}

/// Changed columns of an update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct PaperChanges {
    pub name: Option<String>,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, FromQueryResult)]
struct PaperCount {
    test_paper_id: i32,
    questions_count: i64,
}

/// `test_papers` table access.
#[derive(Debug, Clone)]
pub struct TestPaperRepository {
    db: Database,
}

fn storage(err: DbErr, context: &'static str) -> TestPaperError {
    DatabaseError::from_orm(err, context).into()
}

impl TestPaperRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<&DatabaseConnection, TestPaperError> {
        Ok(self.db.connection()?)
    }

    pub async fn find_all(&self) -> Result<Vec<test_paper::Model>, TestPaperError> {
        TestPaper::find()
            .order_by_asc(test_paper::Column::Id)
            .all(self.conn()?)
            .await
            .map_err(|e| storage(e, "Listing test papers"))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<test_paper::Model>, TestPaperError> {
        TestPaper::find_by_id(id).one(self.conn()?).await.map_err(|e| storage(e, "Loading test paper"))
    }

    /// Question counts per paper in one grouped query; papers without questions are absent.
    pub async fn question_counts(&self, ids: &[i32]) -> Result<FxHashMap<i32, i64>, TestPaperError> {
        if ids.is_empty() {
            return Ok(FxHashMap::default());
        }

        let rows = Question::find()
            .select_only()
            .column(question::Column::TestPaperId)
            .column_as(Expr::col(question::Column::Id).count(), "questions_count")
            .filter(question::Column::TestPaperId.is_in(ids.iter().copied()))
            .group_by(question::Column::TestPaperId)
            .into_model::<PaperCount>()
            .all(self.conn()?)
            .await
            .map_err(|e| storage(e, "Counting questions"))?;

        Ok(rows.into_iter().map(|row| (row.test_paper_id, row.questions_count)).collect())
    }

    pub async fn insert(&self, new: NewPaper) -> Result<test_paper::Model, TestPaperError> {
        let now = Utc::now();
        test_paper::ActiveModel {
            name: Set(new.name),
            duration_minutes: Set(new.duration_minutes),
            is_active: Set(new.is_active),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(self.conn()?)
        .await
        .map_err(|e| storage(e, "Creating test paper"))
    }

    pub async fn update(
        &self,
        existing: test_paper::Model,
        changes: PaperChanges,
    ) -> Result<test_paper::Model, TestPaperError> {
        let mut model: test_paper::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(minutes) = changes.duration_minutes {
            model.duration_minutes = Set(minutes);
        }
        if let Some(active) = changes.is_active {
            model.is_active = Set(active);
        }
        model.updated_at = Set(Some(Utc::now()));

        model.update(self.conn()?).await.map_err(|e| storage(e, "Updating test paper"))
    }

    /// Returns `false` when no row had that id.
    pub async fn delete(&self, id: i32) -> Result<bool, TestPaperError> {
        let outcome = TestPaper::delete_by_id(id)
            .exec(self.conn()?)
            .await
            .map_err(|e| storage(e, "Deleting test paper"))?;
        Ok(outcome.rows_affected > 0)
    }
}
