//! stepform - Terminal Multi-Step Form Library
//!
//! A schema-driven, multi-step data-collection form with progress tracking,
//! short-lived status messages and an editable post-submission record table.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
