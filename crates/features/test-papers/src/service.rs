use crate::error::TestPaperError;
use crate::models::{TestPaperCreate, TestPaperResponse, TestPaperUpdate, check_duration, check_name};
use crate::repository::{NewPaper, PaperChanges, TestPaperRepository};
use mcq_database::entities::test_paper;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct TestPaperService {
    papers: TestPaperRepository,
    default_duration: i32,
}

impl TestPaperService {
    #[must_use]
    pub const fn new(papers: TestPaperRepository, default_duration: i32) -> Self {
        Self { papers, default_duration }
    }

    async fn with_count(&self, paper: test_paper::Model) -> Result<TestPaperResponse, TestPaperError> {
        let count = self.papers.question_counts(&[paper.id]).await?.get(&paper.id).copied();
        Ok(TestPaperResponse::new(paper, count.unwrap_or(0)))
    }

    #[instrument(skip_all, fields(name = %body.name))]
    pub async fn create(&self, body: TestPaperCreate) -> Result<TestPaperResponse, TestPaperError> {
        let new = NewPaper {
            name: check_name(&body.name)?,
            duration_minutes: check_duration(body.duration_minutes.unwrap_or(self.default_duration))?,
            is_active: body.is_active.unwrap_or(true),
        };
        let paper = self.papers.insert(new).await?;
        info!(test_paper_id = paper.id, "Test paper created");
        Ok(TestPaperResponse::new(paper, 0))
    }

    pub async fn list(&self) -> Result<Vec<TestPaperResponse>, TestPaperError> {
        let papers = self.papers.find_all().await?;
        let ids: Vec<i32> = papers.iter().map(|paper| paper.id).collect();
        let counts = self.papers.question_counts(&ids).await?;

        Ok(papers
            .into_iter()
            .map(|paper| {
                let count = counts.get(&paper.id).copied().unwrap_or(0);
                TestPaperResponse::new(paper, count)
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<TestPaperResponse, TestPaperError> {
        let paper = self.papers.find_by_id(id).await?.ok_or(TestPaperError::NotFound { id })?;
        self.with_count(paper).await
    }

    #[instrument(skip_all, fields(test_paper_id = id))]
    pub async fn update(&self, id: i32, body: TestPaperUpdate) -> Result<TestPaperResponse, TestPaperError> {
        let changes = PaperChanges {
            name: body.name.as_deref().map(check_name).transpose()?,
            duration_minutes: body.duration_minutes.map(check_duration).transpose()?,
            is_active: body.is_active,
        };
        let existing = self.papers.find_by_id(id).await?.ok_or(TestPaperError::NotFound { id })?;
        if body.is_empty() {
            return self.with_count(existing).await;
        }

        let paper = self.papers.update(existing, changes).await?;
        info!("Test paper updated");
        self.with_count(paper).await
    }

    /// Questions and results of the paper go with it through the foreign keys.
    #[instrument(skip_all, fields(test_paper_id = id))]
    pub async fn delete(&self, id: i32) -> Result<(), TestPaperError> {
        if !self.papers.delete(id).await? {
            return Err(TestPaperError::NotFound { id });
        }
        info!("Test paper deleted");
        Ok(())
    }
}
