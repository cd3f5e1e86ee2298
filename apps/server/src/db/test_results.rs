//! Database queries for test results.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entity::test_result::{self, ActiveModel as TestResultActiveModel, Entity as TestResult};
use crate::error::{AppError, AppResult};
use crate::models::TestStatus;

use super::DbPool;

/// Represents a test result to be inserted.
pub struct NewTestResult {
    pub test_name: String,
    pub status: TestStatus,
    pub duration: Option<i64>,
    pub retry_count: Option<i32>,
    pub test_suite_id: Option<i64>,
    pub test_run_id: Option<i64>,
    pub executed_by_id: Option<i64>,
}

impl DbPool {
    /// Insert a new test result.
    pub async fn insert_test_result(&self, result: NewTestResult) -> AppResult<test_result::Model> {
        let model = TestResultActiveModel {
            test_name: Set(result.test_name),
            status: Set(result.status.as_str().to_string()),
            duration: Set(result.duration),
            retry_count: Set(result.retry_count),
            test_suite_id: Set(result.test_suite_id),
            test_run_id: Set(result.test_run_id),
            executed_by_id: Set(result.executed_by_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test result: {}", e)))
    }

    /// Results recorded against any of the given suites.
    pub async fn find_results_by_suite_ids(
        &self,
        suite_ids: &[i64],
    ) -> AppResult<Vec<test_result::Model>> {
        if suite_ids.is_empty() {
            return Ok(Vec::new());
        }

        TestResult::find()
            .filter(test_result::Column::TestSuiteId.is_in(suite_ids.iter().copied()))
            .order_by_asc(test_result::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get results by suite: {}", e)))
    }

    /// Results executed by `user_id`, oldest first.
    pub async fn find_results_by_executor(
        &self,
        user_id: i64,
    ) -> AppResult<Vec<test_result::Model>> {
        TestResult::find()
            .filter(test_result::Column::ExecutedById.eq(user_id))
            .order_by_asc(test_result::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get results by executor: {}", e)))
    }

    /// Number of results executed by `user_id`.
    pub async fn count_results_executed_by(&self, user_id: i64) -> AppResult<u64> {
        TestResult::find()
            .filter(test_result::Column::ExecutedById.eq(user_id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count results: {}", e)))
    }

    /// Number of results per executing user. Users without results are absent.
    pub async fn count_results_by_executor(&self) -> AppResult<HashMap<i64, u64>> {
        let rows = TestResult::find()
            .select_only()
            .column(test_result::Column::ExecutedById)
            .column_as(test_result::Column::Id.count(), "executions")
            .filter(test_result::Column::ExecutedById.is_not_null())
            .group_by(test_result::Column::ExecutedById)
            .into_tuple::<(i64, i64)>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count results: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(user_id, count)| (user_id, count as u64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users::NewUser;

    async fn record(pool: &DbPool, name: &str, executed_by_id: Option<i64>) {
        pool.insert_test_result(NewTestResult {
            test_name: name.to_string(),
            status: TestStatus::Passed,
            duration: None,
            retry_count: None,
            test_suite_id: None,
            test_run_id: None,
            executed_by_id,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_count_results_executed_by_ignores_other_users() {
        let pool = DbPool::connect("sqlite::memory:", 1, 1).await.unwrap();
        pool.run_migrations().await.unwrap();
        let mut ids = Vec::new();
        for name in ["dave", "erin"] {
            let user = pool
                .insert_user(NewUser {
                    username: name.to_string(),
                    email: format!("{}@example.com", name),
                    roles: vec!["ROLE_USER".to_string()],
                    enabled: true,
                })
                .await
                .unwrap();
            ids.push(user.id);
        }

        record(&pool, "login", Some(ids[0])).await;
        record(&pool, "logout", Some(ids[0])).await;
        record(&pool, "search", Some(ids[1])).await;
        record(&pool, "anonymous", None).await;

        assert_eq!(pool.count_results_executed_by(ids[0]).await.unwrap(), 2);
        assert_eq!(pool.count_results_executed_by(ids[1]).await.unwrap(), 1);
        assert_eq!(pool.count_results_executed_by(999).await.unwrap(), 0);
    }
}
