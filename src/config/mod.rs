//! Configuration module
//!
//! Handles loading and validation of workout definition files and the
//! read-only exercise catalog the clock consumes.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoadWarning};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
