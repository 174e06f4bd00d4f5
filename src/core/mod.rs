//! Core domain modules

pub mod classifier;
pub mod export;
pub mod models;
pub mod report;
pub mod resolution;
pub mod solver;
pub mod trajectory;
pub mod transcript;

/// Returns the current version of the `gpa-planner` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
