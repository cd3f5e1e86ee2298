//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20251001_000001_create_users;
mod m20251001_000002_create_user_roles;
mod m20251001_000003_create_test_runs;
mod m20251001_000004_create_test_suites;
mod m20251001_000005_create_test_cases;
mod m20251001_000006_create_test_results;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_users::Migration),
            Box::new(m20251001_000002_create_user_roles::Migration),
            Box::new(m20251001_000003_create_test_runs::Migration),
            Box::new(m20251001_000004_create_test_suites::Migration),
            Box::new(m20251001_000005_create_test_cases::Migration),
            Box::new(m20251001_000006_create_test_results::Migration),
        ]
    }
}
