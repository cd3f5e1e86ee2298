//! User API integration tests.
//!
//! Drives the `/api/users` routes against a fresh in-memory SQLite database
//! per test.
//!
//! Run with: cargo test --test users_api

mod test_helpers;

mod test_admin_users;
mod test_current_user;
mod test_my_stats;
mod test_my_tests;
mod test_role_changes;
