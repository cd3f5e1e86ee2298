//! Statistics aggregation over suites and results.
//!
//! Two views exist and they count differently:
//! - [`user_stats`] is suite-scoped. Only `PASSED` and `FAILED` results count
//!   as executed, and the pass rate is taken over executed tests.
//! - [`executor_stats`] covers every result the user executed. Anything not
//!   `PASSED` counts as failed, and the pass rate is taken over all results.

use tracing::{info, warn};

use crate::db::DbPool;
use crate::db::test_suites::SuiteCaseCount;
use crate::entity::test_result;
use crate::error::{AppError, AppResult};
use crate::models::{
    ActivityCounts, ExecutorStats, MyTestEntry, MyTestsResponse, TestStatus, User, UserStats,
};

/// Percentage of `part` in `whole`, or 0.0 for an empty denominator.
fn percentage(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        part as f64 * 100.0 / whole as f64
    } else {
        0.0
    }
}

fn count_status(results: &[test_result::Model], status: TestStatus) -> u64 {
    results
        .iter()
        .filter(|r| TestStatus::parse(&r.status) == Some(status))
        .count() as u64
}

/// Suite-scoped statistics from already loaded suites and their results.
pub fn aggregate_user_stats(
    suites: &[SuiteCaseCount],
    results: &[test_result::Model],
) -> UserStats {
    if suites.is_empty() {
        return UserStats::empty();
    }

    let passed = count_status(results, TestStatus::Passed);
    let failed = count_status(results, TestStatus::Failed);

    let total_test_cases: u64 = suites.iter().map(|s| s.test_case_count).sum();

    let executed = passed + failed;
    // Results for cases since removed from a suite can push executed past the total
    let pending = total_test_cases.saturating_sub(executed);

    UserStats {
        passed,
        failed,
        pending,
        pass_rate: percentage(passed, executed),
        suite_count: suites.len() as u64,
        total_test_cases,
    }
}

/// Statistics over every result a user executed.
pub fn aggregate_executor_stats(
    results: &[test_result::Model],
    test_runs_created: u64,
) -> ExecutorStats {
    let total_tests = results.len() as u64;
    let passed_tests = count_status(results, TestStatus::Passed);

    ExecutorStats {
        total_tests,
        passed_tests,
        failed_tests: total_tests - passed_tests,
        test_runs_created,
        pass_rate: percentage(passed_tests, total_tests),
    }
}

/// History of executed results with the same all-results counting as
/// [`aggregate_executor_stats`].
pub fn summarize_my_tests(username: &str, results: Vec<test_result::Model>) -> MyTestsResponse {
    let passed_tests = count_status(&results, TestStatus::Passed);
    let total_tests = results.len() as u64;

    let tests = results
        .into_iter()
        .map(|r| MyTestEntry {
            test_name: r.test_name,
            status: r.status,
            duration: r.duration.unwrap_or(0),
            created_at: r.created_at,
            retry_count: r.retry_count.unwrap_or(0),
        })
        .collect();

    MyTestsResponse {
        username: username.to_string(),
        total_tests,
        passed_tests,
        failed_tests: total_tests - passed_tests,
        pass_rate: percentage(passed_tests, total_tests),
        tests,
    }
}

/// Resolve `username` or fail with `NotFound`.
pub async fn require_user(pool: &DbPool, username: &str) -> AppResult<User> {
    pool.find_user_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", username)))
}

/// Suite-scoped statistics for the user named `username`.
pub async fn user_stats(pool: &DbPool, username: &str) -> AppResult<UserStats> {
    let user = require_user(pool, username).await?;
    info!("Fetching stats for user: {} (ID: {})", username, user.id);

    let suites = pool.find_suites_by_creator(user.id).await?;
    info!("User {} has {} test suites", username, suites.len());

    if suites.is_empty() {
        return Ok(UserStats::empty());
    }

    let suite_ids: Vec<i64> = suites.iter().map(|s| s.id).collect();
    let results = pool.find_results_by_suite_ids(&suite_ids).await?;
    info!(
        "Found {} total test results from {} suite IDs",
        results.len(),
        suite_ids.len()
    );

    if results.is_empty() {
        warn!(
            "No test results found: user {} has {} suites but none have been executed",
            username,
            suites.len()
        );
    }

    let stats = aggregate_user_stats(&suites, &results);
    info!(
        username,
        suites = stats.suite_count,
        test_cases = stats.total_test_cases,
        passed = stats.passed,
        failed = stats.failed,
        pending = stats.pending,
        pass_rate = %format!("{:.2}", stats.pass_rate),
        "Computed user stats"
    );

    Ok(stats)
}

/// Execution statistics for `user_id`.
pub async fn executor_stats(pool: &DbPool, user_id: i64) -> AppResult<ExecutorStats> {
    let results = pool.find_results_by_executor(user_id).await?;
    let runs = pool.count_runs_created_by(user_id).await?;
    Ok(aggregate_executor_stats(&results, runs))
}

/// Execution and run counters for `user_id`.
pub async fn activity_counts(pool: &DbPool, user_id: i64) -> AppResult<ActivityCounts> {
    let test_executions = pool.count_results_executed_by(user_id).await?;
    let test_runs_created = pool.count_runs_created_by(user_id).await?;
    Ok(ActivityCounts {
        test_executions,
        test_runs_created,
    })
}
