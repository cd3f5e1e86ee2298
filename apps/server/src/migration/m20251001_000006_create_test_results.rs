//! Create test_results table.
//!
//! Results reference their suite directly; statistics are grouped by suite
//! and by executing user, so both columns are indexed.

use sea_orm_migration::prelude::*;

use super::m20251001_000001_create_users::Users;
use super::m20251001_000003_create_test_runs::TestRuns;
use super::m20251001_000004_create_test_suites::TestSuites;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestResults::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TestResults::TestName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TestResults::Status).string_len(20).not_null())
                    .col(ColumnDef::new(TestResults::Duration).big_integer())
                    .col(ColumnDef::new(TestResults::RetryCount).integer())
                    .col(ColumnDef::new(TestResults::TestSuiteId).big_integer())
                    .col(ColumnDef::new(TestResults::TestRunId).big_integer())
                    .col(ColumnDef::new(TestResults::ExecutedById).big_integer())
                    .col(
                        ColumnDef::new(TestResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestResults::Table, TestResults::TestSuiteId)
                            .to(TestSuites::Table, TestSuites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestResults::Table, TestResults::TestRunId)
                            .to(TestRuns::Table, TestRuns::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestResults::Table, TestResults::ExecutedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_results_test_suite_id")
                    .table(TestResults::Table)
                    .col(TestResults::TestSuiteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_results_executed_by_id")
                    .table(TestResults::Table)
                    .col(TestResults::ExecutedById)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestResults {
    Table,
    Id,
    TestName,
    Status,
    Duration,
    RetryCount,
    TestSuiteId,
    TestRunId,
    ExecutedById,
    CreatedAt,
}
