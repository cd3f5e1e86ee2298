//! Tests for `GET /api/users/me/stats`.

use test_framework_api_lib::models::TestStatus;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_stats_over_own_suites() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let alice = seed_regular_user(&pool, "alice").await;

    let suite = seed_suite(&pool, &alice, "login", 3).await;
    seed_result(&pool, "login ok", TestStatus::Passed, Some(suite), Some(&alice)).await;
    seed_result(&pool, "login bad", TestStatus::Failed, Some(suite), Some(&alice)).await;

    let token = token_for(&alice);
    let (status, body) = get_json(&app, "/api/users/me/stats", Some(&token)).await;

    assert_eq!(status, 200);
    assert_eq!(body["passed"], 1);
    assert_eq!(body["failed"], 1);
    assert_eq!(body["pending"], 1);
    assert_eq!(body["passRate"], 50.0);
    assert_eq!(body["suiteCount"], 1);
    assert_eq!(body["totalTestCases"], 3);
}

#[actix_rt::test]
async fn test_user_without_suites_gets_zeroes() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let bob = seed_regular_user(&pool, "bob").await;

    let token = token_for(&bob);
    let (status, body) = get_json(&app, "/api/users/me/stats", Some(&token)).await;

    assert_eq!(status, 200);
    for field in ["passed", "failed", "pending", "suiteCount", "totalTestCases"] {
        assert_eq!(body[field], 0, "{} should be zero", field);
    }
    assert_eq!(body["passRate"], 0.0);
}

#[actix_rt::test]
async fn test_suite_without_cases_still_counts_as_suite() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let alice = seed_regular_user(&pool, "alice").await;

    seed_suite(&pool, &alice, "draft", 0).await;
    seed_suite(&pool, &alice, "search", 2).await;

    let token = token_for(&alice);
    let (status, body) = get_json(&app, "/api/users/me/stats", Some(&token)).await;

    assert_eq!(status, 200);
    assert_eq!(body["suiteCount"], 2);
    assert_eq!(body["totalTestCases"], 2);
    assert_eq!(body["pending"], 2);
}

#[actix_rt::test]
async fn test_results_count_by_suite_not_executor() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let owner = seed_regular_user(&pool, "owner").await;
    let runner = seed_regular_user(&pool, "runner").await;

    let suite = seed_suite(&pool, &owner, "checkout", 2).await;
    // Executed by someone else, still counts for the suite owner
    seed_result(&pool, "pay", TestStatus::Passed, Some(suite), Some(&runner)).await;
    // Owner's result on nobody's suite does not count
    seed_result(&pool, "stray", TestStatus::Failed, None, Some(&owner)).await;

    let (_, owner_stats) =
        get_json(&app, "/api/users/me/stats", Some(&token_for(&owner))).await;
    assert_eq!(owner_stats["passed"], 1);
    assert_eq!(owner_stats["failed"], 0);
    assert_eq!(owner_stats["pending"], 1);
    assert_eq!(owner_stats["passRate"], 100.0);

    let (_, runner_stats) =
        get_json(&app, "/api/users/me/stats", Some(&token_for(&runner))).await;
    assert_eq!(runner_stats["suiteCount"], 0);
    assert_eq!(runner_stats["passed"], 0);
}

#[actix_rt::test]
async fn test_pending_never_negative() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let alice = seed_regular_user(&pool, "alice").await;

    let suite = seed_suite(&pool, &alice, "tiny", 1).await;
    for i in 0..3 {
        let name = format!("rerun {}", i);
        seed_result(&pool, &name, TestStatus::Failed, Some(suite), Some(&alice)).await;
    }

    let (_, body) = get_json(&app, "/api/users/me/stats", Some(&token_for(&alice))).await;
    assert_eq!(body["failed"], 3);
    assert_eq!(body["pending"], 0);
    assert_eq!(body["passRate"], 0.0);
}

#[actix_rt::test]
async fn test_requires_session() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, _) = get_json(&app, "/api/users/me/stats", None).await;
    assert_eq!(status, 401);

    let (status, _) = get_json(&app, "/api/users/me/stats", Some("not-a-token")).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_token_for_deleted_user_is_not_found() {
    let pool = create_test_pool().await;
    let other_pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    // Valid signature, but the user only exists in another database
    let ghost = seed_regular_user(&other_pool, "ghost").await;

    let (status, body) = get_json(&app, "/api/users/me/stats", Some(&token_for(&ghost))).await;
    assert_eq!(status, 404);
    assert!(body.is_null());
}
