//! Tests for promote and demote.

use super::test_helpers::*;

#[actix_rt::test]
async fn test_promote_adds_admin_role() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let admin = seed_admin(&pool, "admin").await;
    let alice = seed_regular_user(&pool, "alice").await;

    let uri = format!("/api/users/{}/promote", alice.id);
    let (status, body) = put_json(&app, &uri, Some(&token_for(&admin))).await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "User promoted to admin");
    assert_eq!(body["username"], "alice");
    assert_eq!(roles_of(&body), ["ROLE_ADMIN", "ROLE_USER"]);
}

#[actix_rt::test]
async fn test_promote_keeps_other_roles() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let admin = seed_admin(&pool, "admin").await;
    let qa = seed_user(&pool, "qa", &["ROLE_USER", "ROLE_QA"]).await;

    let uri = format!("/api/users/{}/promote", qa.id);
    let (_, body) = put_json(&app, &uri, Some(&token_for(&admin))).await;

    assert_eq!(roles_of(&body), ["ROLE_ADMIN", "ROLE_QA", "ROLE_USER"]);
}

#[actix_rt::test]
async fn test_promoted_user_gains_admin_access_with_new_token() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let admin = seed_admin(&pool, "admin").await;
    let alice = seed_regular_user(&pool, "alice").await;

    let uri = format!("/api/users/{}/promote", alice.id);
    put_json(&app, &uri, Some(&token_for(&admin))).await;

    let promoted = pool.find_user_by_id(alice.id).await.unwrap().unwrap();
    let (status, _) = get_json(&app, "/api/users", Some(&token_for(&promoted))).await;
    assert_eq!(status, 200);
}

#[actix_rt::test]
async fn test_demote_replaces_all_roles() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let admin = seed_admin(&pool, "admin").await;
    let other = seed_user(&pool, "other", &["ROLE_ADMIN", "ROLE_QA", "ROLE_USER"]).await;

    let uri = format!("/api/users/{}/demote", other.id);
    let (status, body) = put_json(&app, &uri, Some(&token_for(&admin))).await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Admin demoted to user");
    assert_eq!(body["username"], "other");
    assert_eq!(roles_of(&body), ["ROLE_USER"]);

    let stored = pool.find_user_by_id(other.id).await.unwrap().unwrap();
    assert_eq!(stored.roles.len(), 1);
}

#[actix_rt::test]
async fn test_unknown_user_is_bare_404() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let admin = seed_admin(&pool, "admin").await;
    let token = token_for(&admin);

    let (status, body) = put_json(&app, "/api/users/4242/promote", Some(&token)).await;
    assert_eq!(status, 404);
    assert!(body.is_null());

    let (status, body) = put_json(&app, "/api/users/4242/demote", Some(&token)).await;
    assert_eq!(status, 404);
    assert!(body.is_null());
}

#[actix_rt::test]
async fn test_role_changes_require_admin() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let alice = seed_regular_user(&pool, "alice").await;
    let bob = seed_regular_user(&pool, "bob").await;

    let uri = format!("/api/users/{}/promote", bob.id);
    let (status, _) = put_json(&app, &uri, Some(&token_for(&alice))).await;
    assert_eq!(status, 403);

    let (status, _) = put_json(&app, &uri, None).await;
    assert_eq!(status, 401);

    let unchanged = pool.find_user_by_id(bob.id).await.unwrap().unwrap();
    assert!(!unchanged.is_admin());
}
