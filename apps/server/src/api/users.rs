//! User endpoints: personal statistics and user administration.
//!
//! Mounted under `/api/users`. The `/me` routes need any valid session; the
//! rest require `ROLE_ADMIN`.

use actix_web::{HttpResponse, get, put, web};
use tracing::info;

use crate::auth::{AdminAuth, SessionAuth};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CurrentUserResponse, MyTestsResponse, RoleChangeResponse, UserDetailResponse, UserStats,
    UserSummary,
};
use crate::services::{roles, stats};

/// Configure user routes. `/me` routes are registered before `/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(get_my_stats)
            .service(get_my_tests)
            .service(get_current_user)
            .service(list_users)
            .service(get_user)
            .service(promote_user)
            .service(demote_user),
    );
}

/// Suite-scoped statistics for the caller.
#[utoipa::path(
    get,
    path = "/api/users/me/stats",
    tag = "Users",
    responses(
        (status = 200, description = "Statistics over the caller's suites", body = UserStats),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Session user no longer exists")
    ),
    security(("session" = []))
)]
#[get("/me/stats")]
pub async fn get_my_stats(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let stats = stats::user_stats(pool.get_ref(), &auth.claims.username).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Every result the caller executed, with totals.
#[utoipa::path(
    get,
    path = "/api/users/me/tests",
    tag = "Users",
    responses(
        (status = 200, description = "Caller's executed tests", body = MyTestsResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Session user no longer exists")
    ),
    security(("session" = []))
)]
#[get("/me/tests")]
pub async fn get_my_tests(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let user = stats::require_user(pool.get_ref(), &auth.claims.username).await?;
    let results = pool.find_results_by_executor(user.id).await?;

    Ok(HttpResponse::Ok().json(stats::summarize_my_tests(&user.username, results)))
}

/// Caller profile with activity counters.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Caller profile", body = CurrentUserResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Session user no longer exists")
    ),
    security(("session" = []))
)]
#[get("/me")]
pub async fn get_current_user(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let user = stats::require_user(pool.get_ref(), &auth.claims.username).await?;
    let counts = stats::activity_counts(pool.get_ref(), user.id).await?;

    Ok(HttpResponse::Ok().json(CurrentUserResponse::new(user, counts)))
}

/// All users with execution and run counts.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<UserSummary>),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Admin role required")
    ),
    security(("session" = []))
)]
#[get("")]
pub async fn list_users(auth: AdminAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let users = pool.list_users().await?;
    let executions = pool.count_results_by_executor().await?;
    let runs = pool.count_runs_by_creator().await?;

    let summaries: Vec<UserSummary> = users
        .into_iter()
        .map(|u| {
            let test_executions = executions.get(&u.id).copied().unwrap_or(0);
            let test_runs_created = runs.get(&u.id).copied().unwrap_or(0);
            UserSummary::new(u, test_executions, test_runs_created)
        })
        .collect();

    info!(
        "Admin {} listed {} users",
        auth.claims.username,
        summaries.len()
    );

    Ok(HttpResponse::Ok().json(summaries))
}

/// One user with execution statistics.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserDetailResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    security(("session" = []))
)]
#[get("/{id}")]
pub async fn get_user(
    _auth: AdminAuth,
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = pool
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))?;

    let statistics = stats::executor_stats(pool.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(UserDetailResponse::new(user, statistics)))
}

/// Grant `ROLE_ADMIN`, keeping existing roles.
#[utoipa::path(
    put,
    path = "/api/users/{id}/promote",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User promoted", body = RoleChangeResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    security(("session" = []))
)]
#[put("/{id}/promote")]
pub async fn promote_user(
    _auth: AdminAuth,
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let response = roles::promote(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Replace the role set with exactly `ROLE_USER`.
#[utoipa::path(
    put,
    path = "/api/users/{id}/demote",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User demoted", body = RoleChangeResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    security(("session" = []))
)]
#[put("/{id}/demote")]
pub async fn demote_user(
    _auth: AdminAuth,
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let response = roles::demote(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
