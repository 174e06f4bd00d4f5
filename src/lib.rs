//! Transcript parsing, retake-aware GPA resolution and CGPA planning
//!
//! The library is split into the [`core`] domain modules and the
//! [`config`] layer the `gpaplanner` CLI is built on.

pub mod config;
pub mod core;

pub use core::get_version;
