//! Domain models and API payloads.

pub mod api_response;
pub mod test_method_result;

pub use api_response::ApiResponse;
pub use test_method_result::{
    AssertType, EnvironmentInfo, FailureDetail, NewTestMethodResult, RunIdPage, TestMethodResult,
    TestMethodResultRequest, TestMethodResultResponse, TestStatus,
};
