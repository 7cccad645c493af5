//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod test_results;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use test_results::configure_routes as configure_test_results_routes;
pub use test_results::not_found;
