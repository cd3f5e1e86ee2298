//! Create test_suites table.

use sea_orm_migration::prelude::*;

use super::m20251001_000001_create_users::Users;
use super::m20251001_000003_create_test_runs::TestRuns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestSuites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestSuites::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestSuites::Name).string_len(255).not_null())
                    .col(ColumnDef::new(TestSuites::Description).text())
                    .col(
                        ColumnDef::new(TestSuites::CreatedById)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TestSuites::TestRunId).big_integer())
                    .col(
                        ColumnDef::new(TestSuites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestSuites::Table, TestSuites::CreatedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestSuites::Table, TestSuites::TestRunId)
                            .to(TestRuns::Table, TestRuns::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_suites_created_by_id")
                    .table(TestSuites::Table)
                    .col(TestSuites::CreatedById)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestSuites::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestSuites {
    Table,
    Id,
    Name,
    Description,
    CreatedById,
    TestRunId,
    CreatedAt,
}
