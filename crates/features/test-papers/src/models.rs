//! Bodies of the `/test-papers` routes.

use crate::error::TestPaperError;
use chrono::{DateTime, Utc};
use mcq_database::entities::test_paper;
use mcq_derive::api_model;

const MAX_NAME_LEN: usize = 100;

#[api_model]
pub struct TestPaperCreate {
    pub name: String,
    /// Defaults to `quiz.default_duration_minutes`
    pub duration_minutes: Option<i32>,
    /// Defaults to `true`
    pub is_active: Option<bool>,
}

/// Partial update; absent fields keep their value.
#[api_model]
pub struct TestPaperUpdate {
    pub name: Option<String>,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

#[api_model]
pub struct TestPaperResponse {
    pub id: i32,
    pub name: String,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub questions_count: i64,
}

impl TestPaperResponse {
    #[must_use]
    pub fn new(paper: test_paper::Model, questions_count: i64) -> Self {
        Self {
            id: paper.id,
            name: paper.name,
            duration_minutes: paper.duration_minutes,
            is_active: paper.is_active,
            created_at: paper.created_at,
            updated_at: paper.updated_at,
            questions_count,
        }
    }
}

pub(crate) fn check_name(name: &str) -> Result<String, TestPaperError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TestPaperError::validation("name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(TestPaperError::validation("name must be at most 100 characters long"));
    }
    Ok(name.to_owned())
}

pub(crate) fn check_duration(minutes: i32) -> Result<i32, TestPaperError> {
    if minutes > 0 {
        Ok(minutes)
    } else {
        Err(TestPaperError::validation("duration_minutes must be greater than 0"))
    }
}

impl TestPaperUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.duration_minutes.is_none() && self.is_active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert_eq!(check_name("  Algebra I ").unwrap(), "Algebra I");
        assert!(check_name("   ").is_err());
        assert!(check_name(&"x".repeat(101)).is_err());
        assert!(check_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_duration_rules() {
        assert_eq!(check_duration(45).unwrap(), 45);
        assert_eq!(check_duration(0).unwrap_err().status(), 422);
        assert!(check_duration(-5).is_err());
    }
}
