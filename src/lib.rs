//! QA test result service library.
//!
//! Stores per-method automated test results partitioned by tenant (`iata`)
//! and serves them back by run, suite, feature and status, plus a paginated
//! newest-first index of a tenant's runs.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
