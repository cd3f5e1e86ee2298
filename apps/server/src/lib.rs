//! Test Framework API library.
//!
//! User statistics and administration over test suites, runs and results,
//! plus the broker topology used to dispatch test jobs to workers.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod messaging;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
