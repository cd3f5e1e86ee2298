//! Database queries for test runs.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set,
};

use crate::entity::test_run::{self, ActiveModel as TestRunActiveModel, Entity as TestRun};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Insert a new test run in `PENDING` state.
    pub async fn insert_test_run(
        &self,
        name: &str,
        created_by_id: Option<i64>,
    ) -> AppResult<test_run::Model> {
        let model = TestRunActiveModel {
            name: Set(name.to_string()),
            status: Set("PENDING".to_string()),
            created_by_id: Set(created_by_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test run: {}", e)))
    }

    /// Number of runs created by `user_id`.
    pub async fn count_runs_created_by(&self, user_id: i64) -> AppResult<u64> {
        TestRun::find()
            .filter(test_run::Column::CreatedById.eq(user_id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test runs: {}", e)))
    }

    /// Number of runs per creating user. Users without runs are absent.
    pub async fn count_runs_by_creator(&self) -> AppResult<HashMap<i64, u64>> {
        let rows = TestRun::find()
            .select_only()
            .column(test_run::Column::CreatedById)
            .column_as(test_run::Column::Id.count(), "runs")
            .filter(test_run::Column::CreatedById.is_not_null())
            .group_by(test_run::Column::CreatedById)
            .into_tuple::<(i64, i64)>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test runs: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(user_id, count)| (user_id, count as u64))
            .collect())
    }
}
