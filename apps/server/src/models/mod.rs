//! Domain models and JSON response bodies.

pub mod stats;
pub mod test_result;
pub mod user;

pub use stats::{ActivityCounts, ExecutorStats, UserStats};
pub use test_result::{MyTestEntry, MyTestsResponse, TestStatus};
pub use user::{
    CurrentUserResponse, ROLE_ADMIN, ROLE_USER, RoleChangeResponse, User, UserDetailResponse,
    UserSummary,
};
