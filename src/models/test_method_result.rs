//! Test method result domain models and DTOs.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Outcome of a single test method execution.
///
/// Parsing is case-insensitive and ignores surrounding whitespace,
/// so `" pass "` and `"PASS"` are the same status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
}

impl TestStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        }
    }

    /// Parse from a user-supplied value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PASS" => Some(Self::Pass),
            "FAIL" => Some(Self::Fail),
            "SKIP" => Some(Self::Skip),
            _ => None,
        }
    }
}

impl FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("invalid status '{}', expected one of PASS, FAIL, SKIP", s)
        })
    }
}

impl<'de> Deserialize<'de> for TestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How assertion failures were collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssertType {
    /// Stop at the first failure.
    Hard,
    /// Collect every failure in the method.
    Soft,
}

impl AssertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hard => "HARD",
            Self::Soft => "SOFT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "HARD" => Some(Self::Hard),
            "SOFT" => Some(Self::Soft),
            _ => None,
        }
    }
}

impl FromStr for AssertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| format!("invalid assert type '{}', expected HARD or SOFT", s))
    }
}

impl<'de> Deserialize<'de> for AssertType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for AssertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Environment a test ran in (stored as JSONB).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    /// Deployment name (e.g., QA, Staging, Prod).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_number: Option<String>,
}

/// One assertion failure. Soft asserts may record several per method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
}

/// A result that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestMethodResult {
    pub run_id: String,
    pub iata: String,
    pub suite_type: String,
    pub feature_name: String,
    pub method_name: String,
    pub class_name: String,
    pub status: TestStatus,
    pub assert_type: AssertType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: u64,
    pub jira_test_cases: Option<Vec<String>>,
    pub environment: Option<EnvironmentInfo>,
    pub logs: Option<Vec<String>>,
    pub screenshot_urls: Option<Vec<String>>,
    pub failures: Option<Vec<FailureDetail>>,
}

/// A stored test method result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMethodResult {
    /// Store-assigned UUIDv7, time-ordered.
    pub id: Uuid,
    pub run_id: String,
    pub iata: String,
    pub suite_type: String,
    pub feature_name: String,
    pub method_name: String,
    pub class_name: String,
    pub status: TestStatus,
    pub assert_type: AssertType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: u64,
    pub jira_test_cases: Option<Vec<String>>,
    pub environment: Option<EnvironmentInfo>,
    pub logs: Option<Vec<String>>,
    pub screenshot_urls: Option<Vec<String>>,
    pub failures: Option<Vec<FailureDetail>>,
}

impl TestMethodResult {
    /// Bind a draft to its store-assigned id.
    pub fn from_new(id: Uuid, new: NewTestMethodResult) -> Self {
        TestMethodResult {
            id,
            run_id: new.run_id,
            iata: new.iata,
            suite_type: new.suite_type,
            feature_name: new.feature_name,
            method_name: new.method_name,
            class_name: new.class_name,
            status: new.status,
            assert_type: new.assert_type,
            start_time: new.start_time,
            end_time: new.end_time,
            duration_ms: new.duration_ms,
            jira_test_cases: new.jira_test_cases,
            environment: new.environment,
            logs: new.logs,
            screenshot_urls: new.screenshot_urls,
            failures: new.failures,
        }
    }
}

/// Request body for creating or replacing a test result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestMethodResultRequest {
    /// Identifier shared by every result of one test run.
    pub run_id: String,
    pub suite_type: String,
    pub feature_name: String,
    pub method_name: String,
    pub class_name: String,
    pub status: TestStatus,
    pub assert_type: AssertType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_test_cases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<FailureDetail>>,
}

impl TestMethodResultRequest {
    /// Map the request onto a draft owned by `iata`.
    pub fn into_new(self, iata: &str) -> NewTestMethodResult {
        NewTestMethodResult {
            run_id: self.run_id,
            iata: iata.to_string(),
            suite_type: self.suite_type,
            feature_name: self.feature_name,
            method_name: self.method_name,
            class_name: self.class_name,
            status: self.status,
            assert_type: self.assert_type,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_ms: self.duration_ms,
            jira_test_cases: self.jira_test_cases,
            environment: self.environment,
            logs: self.logs,
            screenshot_urls: self.screenshot_urls,
            failures: self.failures,
        }
    }
}

/// A stored test result as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestMethodResultResponse {
    pub id: Uuid,
    pub run_id: String,
    pub iata: String,
    pub suite_type: String,
    pub feature_name: String,
    pub method_name: String,
    pub class_name: String,
    pub status: TestStatus,
    pub assert_type: AssertType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_test_cases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<FailureDetail>>,
}

impl From<TestMethodResult> for TestMethodResultResponse {
    fn from(r: TestMethodResult) -> Self {
        TestMethodResultResponse {
            id: r.id,
            run_id: r.run_id,
            iata: r.iata,
            suite_type: r.suite_type,
            feature_name: r.feature_name,
            method_name: r.method_name,
            class_name: r.class_name,
            status: r.status,
            assert_type: r.assert_type,
            start_time: r.start_time,
            end_time: r.end_time,
            duration_ms: r.duration_ms,
            jira_test_cases: r.jira_test_cases,
            environment: r.environment,
            logs: r.logs,
            screenshot_urls: r.screenshot_urls,
            failures: r.failures,
        }
    }
}

/// One page of distinct run ids for a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunIdPage {
    /// Zero-based page index actually served (negative requests are clamped to 0).
    pub page: u64,
    pub size: u32,
    /// Run ids, newest run first.
    pub run_ids: Vec<String>,
}
