//! Database queries for test suites and their test cases.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entity::test_case::{self, ActiveModel as TestCaseActiveModel, Entity as TestCase};
use crate::entity::test_suite::{self, ActiveModel as TestSuiteActiveModel, Entity as TestSuite};
use crate::error::{AppError, AppResult};

use super::DbPool;

/// Represents a test suite to be inserted.
pub struct NewTestSuite {
    pub name: String,
    pub description: Option<String>,
    pub created_by_id: i64,
    pub test_run_id: Option<i64>,
}

/// A suite together with the size of its test case collection. Suites
/// without cases carry a count of zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteCaseCount {
    pub id: i64,
    pub name: String,
    pub test_case_count: u64,
}

impl DbPool {
    /// Insert a new test suite.
    pub async fn insert_test_suite(&self, suite: NewTestSuite) -> AppResult<test_suite::Model> {
        let model = TestSuiteActiveModel {
            name: Set(suite.name),
            description: Set(suite.description),
            created_by_id: Set(suite.created_by_id),
            test_run_id: Set(suite.test_run_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test suite: {}", e)))
    }

    /// Insert a test case into a suite.
    pub async fn insert_test_case(&self, suite_id: i64, name: &str) -> AppResult<test_case::Model> {
        let model = TestCaseActiveModel {
            test_suite_id: Set(suite_id),
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test case: {}", e)))
    }

    /// Suites created by `user_id`, each with its test case count.
    pub async fn find_suites_by_creator(&self, user_id: i64) -> AppResult<Vec<SuiteCaseCount>> {
        let suites = TestSuite::find()
            .filter(test_suite::Column::CreatedById.eq(user_id))
            .order_by_asc(test_suite::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test suites: {}", e)))?;

        if suites.is_empty() {
            return Ok(Vec::new());
        }

        let suite_ids: Vec<i64> = suites.iter().map(|s| s.id).collect();
        let counts: HashMap<i64, i64> = TestCase::find()
            .select_only()
            .column(test_case::Column::TestSuiteId)
            .column_as(test_case::Column::Id.count(), "case_count")
            .filter(test_case::Column::TestSuiteId.is_in(suite_ids))
            .group_by(test_case::Column::TestSuiteId)
            .into_tuple::<(i64, i64)>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test cases: {}", e)))?
            .into_iter()
            .collect();

        Ok(suites
            .into_iter()
            .map(|s| SuiteCaseCount {
                test_case_count: counts.get(&s.id).copied().unwrap_or(0) as u64,
                id: s.id,
                name: s.name,
            })
            .collect())
    }
}
