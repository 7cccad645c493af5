//! Distinct run-id index: one page of a tenant's runs, newest first.
//!
//! Pipeline stages, in this exact order:
//!
//! 1. filter records by tenant (`iata`)
//! 2. group by `run_id`
//! 3. sort groups newest first by the earliest record id of each run
//! 4. skip `page * page_size`
//! 5. limit to `page_size`
//! 6. project the run id
//!
//! Record ids are UUIDv7, so id order is creation order. Sorting must happen
//! before skip/limit, otherwise consecutive pages overlap or drop runs.

use std::collections::HashMap;
use std::num::NonZeroU32;

use sea_orm::{DatabaseBackend, Statement};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::TestMethodResult;

/// Single-statement form of the pipeline for PostgreSQL.
///
/// There is no `min(uuid)` aggregate; the canonical text form of a UUID sorts
/// exactly like its bytes.
pub const RUN_ID_PAGE_SQL: &str = r#"
    SELECT run_id
    FROM test_method_results
    WHERE iata = $1
    GROUP BY run_id
    ORDER BY MIN(id::text) DESC, run_id DESC
    LIMIT $2
    OFFSET $3
"#;

/// A validated request for one page of run ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdPageQuery {
    iata: String,
    page: u64,
    page_size: NonZeroU32,
}

impl RunIdPageQuery {
    /// Negative pages are clamped to 0. The tenant code must not be blank.
    pub fn new(iata: &str, page: i64, page_size: NonZeroU32) -> AppResult<Self> {
        if iata.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "iata must not be empty".to_string(),
            ));
        }

        Ok(RunIdPageQuery {
            iata: iata.to_string(),
            page: page.max(0) as u64,
            page_size,
        })
    }

    pub fn iata(&self) -> &str {
        &self.iata
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Number of runs skipped before this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(u64::from(self.page_size.get()))
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size.get())
    }

    /// Bind this query to [`RUN_ID_PAGE_SQL`].
    pub fn statement(&self) -> Statement {
        Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            RUN_ID_PAGE_SQL,
            [
                self.iata.clone().into(),
                clamp_i64(self.limit()).into(),
                clamp_i64(self.offset()).into(),
            ],
        )
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Run the pipeline over records held in process.
pub fn page_run_ids<'a, I>(records: I, query: &RunIdPageQuery) -> Vec<String>
where
    I: IntoIterator<Item = &'a TestMethodResult>,
{
    // Filter + group: earliest record id per run
    let mut runs: HashMap<&'a str, Uuid> = HashMap::new();
    for record in records.into_iter().filter(|r| r.iata == query.iata) {
        runs.entry(record.run_id.as_str())
            .and_modify(|first| {
                if record.id < *first {
                    *first = record.id;
                }
            })
            .or_insert(record.id);
    }

    // Sort: newest run first
    let mut groups: Vec<(&str, Uuid)> = runs.into_iter().collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(a.0)));

    let skip = usize::try_from(query.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(query.limit()).unwrap_or(usize::MAX);

    groups
        .into_iter()
        .skip(skip)
        .take(take)
        .map(|(run_id, _)| run_id.to_string())
        .collect()
}
