//! Test result entity representing one executed test.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "test_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub test_name: String,
    /// Upper-case status name, e.g. `PASSED`.
    pub status: String,
    /// Execution time in milliseconds.
    pub duration: Option<i64>,
    pub retry_count: Option<i32>,
    pub test_suite_id: Option<i64>,
    pub test_run_id: Option<i64>,
    pub executed_by_id: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_suite::Entity",
        from = "Column::TestSuiteId",
        to = "super::test_suite::Column::Id",
        on_delete = "Cascade"
    )]
    TestSuite,
    #[sea_orm(
        belongs_to = "super::test_run::Entity",
        from = "Column::TestRunId",
        to = "super::test_run::Column::Id",
        on_delete = "SetNull"
    )]
    TestRun,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ExecutedById",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Executor,
}

impl Related<super::test_suite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestSuite.def()
    }
}

impl Related<super::test_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestRun.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Executor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
