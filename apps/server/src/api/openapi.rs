//! OpenAPI documentation configuration.

use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Test Framework API",
        version = "0.1.0",
        description = "User statistics and administration for the test execution framework"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // User endpoints
        api::users::get_my_stats,
        api::users::get_my_tests,
        api::users::get_current_user,
        api::users::list_users,
        api::users::get_user,
        api::users::promote_user,
        api::users::demote_user,
    ),
    components(
        schemas(
            error::ErrorResponse,
            api::health::HealthResponse,
            api::health::ReadyResponse,
            models::UserStats,
            models::ExecutorStats,
            models::ActivityCounts,
            models::MyTestEntry,
            models::MyTestsResponse,
            models::TestStatus,
            models::UserSummary,
            models::UserDetailResponse,
            models::CurrentUserResponse,
            models::RoleChangeResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "Personal statistics and user administration")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer session security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
