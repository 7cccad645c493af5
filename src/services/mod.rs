//! Business logic services.

pub mod test_results;

pub use test_results::TestResultService;
