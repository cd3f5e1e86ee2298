//! Tests for `GET /api/users/me/tests`.

use test_framework_api_lib::db::test_results::NewTestResult;
use test_framework_api_lib::models::TestStatus;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_lists_executed_results_with_totals() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let alice = seed_regular_user(&pool, "alice").await;
    let bob = seed_regular_user(&pool, "bob").await;

    seed_result(&pool, "a", TestStatus::Passed, None, Some(&alice)).await;
    seed_result(&pool, "b", TestStatus::Skipped, None, Some(&alice)).await;
    seed_result(&pool, "c", TestStatus::Failed, None, Some(&alice)).await;
    seed_result(&pool, "d", TestStatus::Passed, None, Some(&bob)).await;

    let (status, body) = get_json(&app, "/api/users/me/tests", Some(&token_for(&alice))).await;

    assert_eq!(status, 200);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["totalTests"], 3);
    assert_eq!(body["passedTests"], 1);
    // Everything not PASSED counts as failed here
    assert_eq!(body["failedTests"], 2);
    let pass_rate = body["passRate"].as_f64().unwrap();
    assert!((pass_rate - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(body["tests"].as_array().unwrap().len(), 3);
}

#[actix_rt::test]
async fn test_missing_duration_and_retries_default_to_zero() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let alice = seed_regular_user(&pool, "alice").await;

    pool.insert_test_result(NewTestResult {
        test_name: "timed".to_string(),
        status: TestStatus::Passed,
        duration: Some(1250),
        retry_count: Some(2),
        test_suite_id: None,
        test_run_id: None,
        executed_by_id: Some(alice.id),
    })
    .await
    .unwrap();
    seed_result(&pool, "untimed", TestStatus::Failed, None, Some(&alice)).await;

    let (_, body) = get_json(&app, "/api/users/me/tests", Some(&token_for(&alice))).await;
    let tests = body["tests"].as_array().unwrap();

    let timed = tests.iter().find(|t| t["testName"] == "timed").unwrap();
    assert_eq!(timed["duration"], 1250);
    assert_eq!(timed["retryCount"], 2);
    assert_eq!(timed["status"], "PASSED");
    assert!(timed["createdAt"].is_string());

    let untimed = tests.iter().find(|t| t["testName"] == "untimed").unwrap();
    assert_eq!(untimed["duration"], 0);
    assert_eq!(untimed["retryCount"], 0);
}

#[actix_rt::test]
async fn test_no_results_is_empty_list() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let alice = seed_regular_user(&pool, "alice").await;

    let (status, body) = get_json(&app, "/api/users/me/tests", Some(&token_for(&alice))).await;
    assert_eq!(status, 200);
    assert_eq!(body["totalTests"], 0);
    assert_eq!(body["failedTests"], 0);
    assert_eq!(body["passRate"], 0.0);
    assert!(body["tests"].as_array().unwrap().is_empty());
}
