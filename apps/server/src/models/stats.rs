//! Derived statistics. Computed per request, never stored.

use serde::Serialize;
use utoipa::ToSchema;

/// Suite-scoped statistics for the calling user (`GET /api/users/me/stats`).
///
/// `pass_rate` is a percentage of executed tests (passed + failed); pending
/// tests are not part of the denominator.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub passed: u64,
    pub failed: u64,
    pub pending: u64,
    pub pass_rate: f64,
    pub suite_count: u64,
    pub total_test_cases: u64,
}

impl UserStats {
    /// Statistics of a user who owns no suites.
    pub fn empty() -> Self {
        Self {
            passed: 0,
            failed: 0,
            pending: 0,
            pass_rate: 0.0,
            suite_count: 0,
            total_test_cases: 0,
        }
    }
}

/// Execution statistics over every result a user executed.
///
/// Unlike [`UserStats`], every non-passed result counts as failed and the
/// pass rate is taken over all results.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorStats {
    pub total_tests: u64,
    pub passed_tests: u64,
    pub failed_tests: u64,
    pub test_runs_created: u64,
    pub pass_rate: f64,
}

/// Activity counters shown on the caller's own profile.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCounts {
    pub test_executions: u64,
    pub test_runs_created: u64,
}
