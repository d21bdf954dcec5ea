//! # addmarks
//!
//! Client for entering class-test marks and submitting them to the academic
//! management backend: pick a year, branch and subject, fetch the matching
//! students, type per-question marks for one of them and post the result.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Typed client for the backend endpoints
pub mod api;
/// Environment driven settings and the shared HTTP client
pub mod config;
/// Endpoint paths, question layout and user-facing messages
pub mod constants;
/// Mark entry and per-section range validation
pub mod marks;
/// Terminal tables for students, subjects and the marks sheet
pub mod render;
/// Drives the marks entry workflow against a backend
pub mod session;
/// Application state snapshots and their update functions
pub mod state;
/// Background subject reloading tied to the selected year
pub mod subjects;
/// Years, branches, class tests, students and subjects
pub mod types;

pub use api::{ApiError, HttpBackend, MarksBackend, MarksSubmission, StudentQuery};
pub use config::Config;
pub use marks::{MarksEntry, Section, ValidationErrors, validate_mark};
pub use session::Session;
pub use state::{AppState, FilterState, Notice, NoticeLevel};
pub use types::{Branch, ClassTest, Scalar, Student, Subject, Year};
