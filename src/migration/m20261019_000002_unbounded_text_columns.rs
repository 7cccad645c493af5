//! Migration: Drop length caps on identifier and name columns.
//!
//! Run ids, tenant codes and test names have no length limit; the API
//! accepts any length, so the columns must too.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE test_method_results
                    ALTER COLUMN run_id TYPE TEXT,
                    ALTER COLUMN iata TYPE TEXT,
                    ALTER COLUMN suite_type TYPE TEXT,
                    ALTER COLUMN feature_name TYPE TEXT,
                    ALTER COLUMN method_name TYPE TEXT,
                    ALTER COLUMN class_name TYPE TEXT;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE test_method_results
                    ALTER COLUMN run_id TYPE VARCHAR(255),
                    ALTER COLUMN iata TYPE VARCHAR(64),
                    ALTER COLUMN suite_type TYPE VARCHAR(100),
                    ALTER COLUMN feature_name TYPE VARCHAR(255),
                    ALTER COLUMN method_name TYPE VARCHAR(255),
                    ALTER COLUMN class_name TYPE VARCHAR(500);
                "#,
            )
            .await?;

        Ok(())
    }
}
