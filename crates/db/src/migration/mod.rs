//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. The schema is built with
//! the sea-query builder so it runs on both Postgres and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_catalog;
mod m20260301_000002_ledger;
mod m20260301_000003_documents;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_catalog::Migration),
            Box::new(m20260301_000002_ledger::Migration),
            Box::new(m20260301_000003_documents::Migration),
        ]
    }
}
