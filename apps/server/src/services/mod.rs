//! Business logic services.

pub mod roles;
pub mod stats;
