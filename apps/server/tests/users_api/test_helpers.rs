//! Shared test helpers for user API tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use secrecy::SecretString;
use serde_json::Value;

use test_framework_api_lib::api;
use test_framework_api_lib::auth::SessionKeys;
use test_framework_api_lib::db::DbPool;
use test_framework_api_lib::db::test_results::NewTestResult;
use test_framework_api_lib::db::test_suites::NewTestSuite;
use test_framework_api_lib::db::users::NewUser;
use test_framework_api_lib::models::{ROLE_ADMIN, ROLE_USER, TestStatus, User};

/// Signing secret used in tests.
pub const TEST_SESSION_SECRET: &str = "test-session-secret-for-users-api";

/// Create a migrated in-memory database. One connection keeps it alive.
pub async fn create_test_pool() -> DbPool {
    let pool = DbPool::connect("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn session_keys() -> SessionKeys {
    SessionKeys::new(SecretString::from(TEST_SESSION_SECRET.to_string()), 3600)
}

/// Bearer token carrying the user's current roles.
pub fn token_for(user: &User) -> String {
    session_keys().issue(user).expect("Failed to issue token")
}

/// Create a test app with the user routes mounted under `/api`.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(session_keys()))
            .service(
                web::scope("/api")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_user_routes),
            ),
    )
    .await
}

pub async fn seed_user(pool: &DbPool, username: &str, roles: &[&str]) -> User {
    pool.insert_user(NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        enabled: true,
    })
    .await
    .expect("Failed to insert user")
}

pub async fn seed_regular_user(pool: &DbPool, username: &str) -> User {
    seed_user(pool, username, &[ROLE_USER]).await
}

pub async fn seed_admin(pool: &DbPool, username: &str) -> User {
    seed_user(pool, username, &[ROLE_USER, ROLE_ADMIN]).await
}

/// Insert a suite owned by `creator` with `cases` test cases. Returns its ID.
pub async fn seed_suite(pool: &DbPool, creator: &User, name: &str, cases: usize) -> i64 {
    let suite = pool
        .insert_test_suite(NewTestSuite {
            name: name.to_string(),
            description: None,
            created_by_id: creator.id,
            test_run_id: None,
        })
        .await
        .expect("Failed to insert suite");

    for i in 0..cases {
        pool.insert_test_case(suite.id, &format!("{} case {}", name, i + 1))
            .await
            .expect("Failed to insert test case");
    }

    suite.id
}

pub async fn seed_result(
    pool: &DbPool,
    test_name: &str,
    status: TestStatus,
    suite_id: Option<i64>,
    executor: Option<&User>,
) {
    pool.insert_test_result(NewTestResult {
        test_name: test_name.to_string(),
        status,
        duration: None,
        retry_count: None,
        test_suite_id: suite_id,
        test_run_id: None,
        executed_by_id: executor.map(|u| u.id),
    })
    .await
    .expect("Failed to insert result");
}

pub async fn seed_run(pool: &DbPool, creator: &User, name: &str) {
    pool.insert_test_run(name, Some(creator.id))
        .await
        .expect("Failed to insert run");
}

async fn into_status_and_json(resp: ServiceResponse) -> (u16, Value) {
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    // Bare 404s have no body
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// GET `uri`, optionally with a bearer token.
pub async fn get_json<S>(app: &S, uri: &str, token: Option<&str>) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut req = test::TestRequest::get().uri(uri);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {}", token)));
    }

    let resp = test::call_service(app, req.to_request()).await;
    into_status_and_json(resp).await
}

/// PUT `uri` without a body, optionally with a bearer token.
pub async fn put_json<S>(app: &S, uri: &str, token: Option<&str>) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut req = test::TestRequest::put().uri(uri);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {}", token)));
    }

    let resp = test::call_service(app, req.to_request()).await;
    into_status_and_json(resp).await
}

/// Role names of a JSON user object.
pub fn roles_of(body: &Value) -> Vec<String> {
    body["roles"]
        .as_array()
        .map(|roles| {
            roles
                .iter()
                .filter_map(|r| r.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
