//! Migration: Create test_method_results table and shared trigger function.
//!
//! One row per executed test method. Embedded sub-documents (environment,
//! failures, string lists) are stored as JSONB.

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
                -- Shared trigger function for updated_at
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                CREATE TABLE test_method_results (
                    id UUID PRIMARY KEY, -- UUIDv7 for time-ordered sorting

                    -- Partitioning and grouping
                    run_id VARCHAR(255) NOT NULL,
                    iata VARCHAR(64) NOT NULL,

                    -- Classification
                    suite_type VARCHAR(100) NOT NULL,
                    feature_name VARCHAR(255) NOT NULL,
                    method_name VARCHAR(255) NOT NULL,
                    class_name VARCHAR(500) NOT NULL,

                    -- Outcome
                    status VARCHAR(10) NOT NULL
                        CHECK (status IN ('PASS', 'FAIL', 'SKIP')),
                    assert_type VARCHAR(10) NOT NULL
                        CHECK (assert_type IN ('HARD', 'SOFT')),

                    -- Timing
                    start_time TIMESTAMPTZ NOT NULL,
                    end_time TIMESTAMPTZ NOT NULL,
                    duration_ms BIGINT NOT NULL DEFAULT 0
                        CHECK (duration_ms >= 0),

                    -- Embedded documents (nullable = absent)
                    jira_test_cases JSONB,
                    environment JSONB,
                    logs JSONB,
                    screenshot_urls JSONB,
                    failures JSONB,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Tenant partition lookups and the run-id index
                CREATE INDEX idx_test_method_results_iata ON test_method_results(iata);

                -- Every read filters by run and tenant
                CREATE INDEX idx_test_method_results_iata_run_id
                    ON test_method_results(iata, run_id);

                -- Trigger to update updated_at
                CREATE TRIGGER update_test_method_results_updated_at
                    BEFORE UPDATE ON test_method_results
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
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
                DROP TRIGGER IF EXISTS update_test_method_results_updated_at ON test_method_results;
                DROP TABLE IF EXISTS test_method_results CASCADE;
                DROP FUNCTION IF EXISTS update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }
}
