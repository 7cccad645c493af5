//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20261019_000001_create_test_method_results;
mod m20261019_000002_unbounded_text_columns;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_create_test_method_results::Migration),
            Box::new(m20261019_000002_unbounded_text_columns::Migration),
        ]
    }
}
