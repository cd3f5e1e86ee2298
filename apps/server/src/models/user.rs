//! User models and role handling.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::stats::{ActivityCounts, ExecutorStats};

/// Role granted to every registered user.
pub const ROLE_USER: &str = "ROLE_USER";
/// Role required by the administration endpoints.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// User with its role set, assembled from `users` and `user_roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: BTreeSet<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Add a role, keeping every role already held.
    ///
    /// Returns `false` if the user already had it.
    pub fn add_role(&mut self, role: &str) -> bool {
        self.roles.insert(role.to_string())
    }

    /// Discard the whole role set and install `roles` in its place.
    pub fn replace_roles<I, S>(&mut self, roles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
    }
}

/// Entry of the admin user listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: BTreeSet<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub test_executions: u64,
    pub test_runs_created: u64,
}

impl UserSummary {
    pub fn new(user: User, test_executions: u64, test_runs_created: u64) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            roles: user.roles,
            enabled: user.enabled,
            created_at: user.created_at,
            test_executions,
            test_runs_created,
        }
    }
}

/// Single user as seen by an administrator.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: BTreeSet<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub statistics: ExecutorStats,
}

impl UserDetailResponse {
    pub fn new(user: User, statistics: ExecutorStats) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            roles: user.roles,
            enabled: user.enabled,
            created_at: user.created_at,
            statistics,
        }
    }
}

/// Profile of the calling user (`GET /api/users/me`).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: BTreeSet<String>,
    pub statistics: ActivityCounts,
}

impl CurrentUserResponse {
    pub fn new(user: User, statistics: ActivityCounts) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            roles: user.roles,
            statistics,
        }
    }
}

/// Result of a promote or demote call.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleChangeResponse {
    pub message: String,
    pub username: String,
    pub roles: BTreeSet<String>,
}
