//! Role administration: promote and demote.
//!
//! Promotion adds `ROLE_ADMIN` to whatever the user already holds. Demotion
//! replaces the entire role set with `ROLE_USER`, dropping any other role.

use tracing::info;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ROLE_ADMIN, ROLE_USER, RoleChangeResponse, User};

async fn require_user(pool: &DbPool, id: i64) -> AppResult<User> {
    pool.find_user_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))
}

/// Grant `ROLE_ADMIN` to user `id`, keeping its existing roles.
pub async fn promote(pool: &DbPool, id: i64) -> AppResult<RoleChangeResponse> {
    let mut user = require_user(pool, id).await?;

    user.add_role(ROLE_ADMIN);
    pool.add_user_role(user.id, ROLE_ADMIN).await?;

    info!("User {} promoted to ADMIN", user.username);

    Ok(RoleChangeResponse {
        message: "User promoted to admin".to_string(),
        username: user.username,
        roles: user.roles,
    })
}

/// Overwrite the role set of user `id` with exactly `ROLE_USER`.
pub async fn demote(pool: &DbPool, id: i64) -> AppResult<RoleChangeResponse> {
    let mut user = require_user(pool, id).await?;

    user.replace_roles([ROLE_USER]);
    pool.replace_user_roles(user.id, &user.roles).await?;

    info!("User {} demoted to USER", user.username);

    Ok(RoleChangeResponse {
        message: "Admin demoted to user".to_string(),
        username: user.username,
        roles: user.roles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users::NewUser;
    use tempfile::tempdir;

    async fn pool_with_user(roles: &[&str]) -> (DbPool, i64) {
        let pool = DbPool::connect("sqlite::memory:", 1, 1).await.unwrap();
        pool.run_migrations().await.unwrap();
        let user = pool
            .insert_user(NewUser {
                username: "carol".to_string(),
                email: "carol@example.com".to_string(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
                enabled: true,
            })
            .await
            .unwrap();
        (pool, user.id)
    }

    #[tokio::test]
    async fn test_promote_keeps_existing_roles() {
        let (pool, id) = pool_with_user(&[ROLE_USER, "ROLE_QA"]).await;

        let response = promote(&pool, id).await.unwrap();
        assert_eq!(response.message, "User promoted to admin");
        let roles: Vec<&str> = response.roles.iter().map(String::as_str).collect();
        assert_eq!(roles, ["ROLE_ADMIN", "ROLE_QA", "ROLE_USER"]);

        let stored = pool.find_user_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.roles, response.roles);
    }

    #[tokio::test]
    async fn test_promote_twice_is_idempotent() {
        let (pool, id) = pool_with_user(&[ROLE_USER]).await;
        promote(&pool, id).await.unwrap();
        let response = promote(&pool, id).await.unwrap();
        assert_eq!(response.roles.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_promotes_both_succeed() {
        let dir = tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("roles.db").display());
        let pool = DbPool::connect(&url, 8, 1).await.unwrap();
        pool.run_migrations().await.unwrap();

        for n in 0..20 {
            let user = pool
                .insert_user(NewUser {
                    username: format!("user{}", n),
                    email: format!("user{}@example.com", n),
                    roles: vec![ROLE_USER.to_string()],
                    enabled: true,
                })
                .await
                .unwrap();

            let (first, second) = tokio::join!(promote(&pool, user.id), promote(&pool, user.id));
            assert!(first.is_ok(), "first promote failed: {:?}", first.err());
            assert!(second.is_ok(), "second promote failed: {:?}", second.err());

            let stored = pool.find_user_by_id(user.id).await.unwrap().unwrap();
            let roles: Vec<&str> = stored.roles.iter().map(String::as_str).collect();
            assert_eq!(roles, ["ROLE_ADMIN", "ROLE_USER"]);
        }
    }

    #[tokio::test]
    async fn test_demote_overwrites_role_set() {
        let (pool, id) = pool_with_user(&[ROLE_ADMIN, "ROLE_QA"]).await;

        let response = demote(&pool, id).await.unwrap();
        assert_eq!(response.message, "Admin demoted to user");
        assert_eq!(response.username, "carol");

        let stored = pool.find_user_by_id(id).await.unwrap().unwrap();
        let roles: Vec<&str> = stored.roles.iter().map(String::as_str).collect();
        assert_eq!(roles, ["ROLE_USER"]);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (pool, _) = pool_with_user(&[ROLE_USER]).await;
        assert!(matches!(promote(&pool, 999).await, Err(AppError::NotFound(_))));
        assert!(matches!(demote(&pool, 999).await, Err(AppError::NotFound(_))));
    }
}
