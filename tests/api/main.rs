//! HTTP API test suite.
//!
//! Runs the full actix-web app against the in-memory record store, so no
//! database is needed.
//!
//! Run with: cargo test --test api

mod helpers;

mod test_create;
mod test_errors;
mod test_lookup;
