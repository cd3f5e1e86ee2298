//! Tests for `GET /api/users/me`.

use test_framework_api_lib::models::TestStatus;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_profile_with_activity_counts() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let alice = seed_regular_user(&pool, "alice").await;

    seed_result(&pool, "a", TestStatus::Passed, None, Some(&alice)).await;
    seed_result(&pool, "b", TestStatus::Running, None, Some(&alice)).await;
    seed_run(&pool, &alice, "nightly").await;

    let (status, body) = get_json(&app, "/api/users/me", Some(&token_for(&alice))).await;

    assert_eq!(status, 200);
    assert_eq!(body["id"], alice.id);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(roles_of(&body), ["ROLE_USER"]);
    assert_eq!(body["statistics"]["testExecutions"], 2);
    assert_eq!(body["statistics"]["testRunsCreated"], 1);
}

#[actix_rt::test]
async fn test_me_is_not_shadowed_by_id_route() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    // A regular user must reach /me even though /{id} is admin-only
    let alice = seed_regular_user(&pool, "alice").await;

    let (status, _) = get_json(&app, "/api/users/me", Some(&token_for(&alice))).await;
    assert_eq!(status, 200);
}

#[actix_rt::test]
async fn test_requires_session() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(&app, "/api/users/me", None).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");
}
