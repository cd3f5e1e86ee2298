//! Tests for the admin listing and detail routes.

use test_framework_api_lib::models::TestStatus;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_list_users_with_counts() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let admin = seed_admin(&pool, "admin").await;
    let alice = seed_regular_user(&pool, "alice").await;
    let bob = seed_regular_user(&pool, "bob").await;

    seed_result(&pool, "a1", TestStatus::Passed, None, Some(&alice)).await;
    seed_result(&pool, "a2", TestStatus::Failed, None, Some(&alice)).await;
    seed_result(&pool, "orphan", TestStatus::Passed, None, None).await;
    seed_run(&pool, &alice, "r1").await;
    seed_run(&pool, &bob, "r2").await;
    seed_run(&pool, &bob, "r3").await;

    let (status, body) = get_json(&app, "/api/users", Some(&token_for(&admin))).await;

    assert_eq!(status, 200);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 3);

    let find = |name: &str| users.iter().find(|u| u["username"] == name).unwrap().clone();

    let alice_entry = find("alice");
    assert_eq!(alice_entry["testExecutions"], 2);
    assert_eq!(alice_entry["testRunsCreated"], 1);
    assert_eq!(alice_entry["enabled"], true);
    assert!(alice_entry["createdAt"].is_string());

    let bob_entry = find("bob");
    assert_eq!(bob_entry["testExecutions"], 0);
    assert_eq!(bob_entry["testRunsCreated"], 2);

    let admin_entry = find("admin");
    assert_eq!(roles_of(&admin_entry), ["ROLE_ADMIN", "ROLE_USER"]);
    assert_eq!(admin_entry["testExecutions"], 0);
}

#[actix_rt::test]
async fn test_list_requires_admin() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let alice = seed_regular_user(&pool, "alice").await;

    let (status, body) = get_json(&app, "/api/users", Some(&token_for(&alice))).await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, _) = get_json(&app, "/api/users", None).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_user_detail_statistics() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let admin = seed_admin(&pool, "admin").await;
    let alice = seed_regular_user(&pool, "alice").await;

    seed_result(&pool, "a", TestStatus::Passed, None, Some(&alice)).await;
    seed_result(&pool, "b", TestStatus::Passed, None, Some(&alice)).await;
    seed_result(&pool, "c", TestStatus::Pending, None, Some(&alice)).await;
    seed_result(&pool, "d", TestStatus::Failed, None, Some(&alice)).await;
    seed_run(&pool, &alice, "nightly").await;

    let uri = format!("/api/users/{}", alice.id);
    let (status, body) = get_json(&app, &uri, Some(&token_for(&admin))).await;

    assert_eq!(status, 200);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["enabled"], true);
    let stats = &body["statistics"];
    assert_eq!(stats["totalTests"], 4);
    assert_eq!(stats["passedTests"], 2);
    assert_eq!(stats["failedTests"], 2);
    assert_eq!(stats["testRunsCreated"], 1);
    assert_eq!(stats["passRate"], 50.0);
}

#[actix_rt::test]
async fn test_user_detail_without_results() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let admin = seed_admin(&pool, "admin").await;
    let idle = seed_regular_user(&pool, "idle").await;

    let uri = format!("/api/users/{}", idle.id);
    let (status, body) = get_json(&app, &uri, Some(&token_for(&admin))).await;

    assert_eq!(status, 200);
    assert_eq!(body["statistics"]["totalTests"], 0);
    assert_eq!(body["statistics"]["passRate"], 0.0);
}

#[actix_rt::test]
async fn test_unknown_user_detail_is_bare_404() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let admin = seed_admin(&pool, "admin").await;

    let (status, body) = get_json(&app, "/api/users/9999", Some(&token_for(&admin))).await;
    assert_eq!(status, 404);
    assert!(body.is_null());
}
