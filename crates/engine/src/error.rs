//! The module contains the errors the engine can return.
//!
//! The engine is pure, so every error is a validation error raised while
//! turning user input into domain values:
//!
//! - [`InvalidAmount`] for costs and budget limits that do not parse.
//! - [`InvalidDate`] for expense dates that are not `YYYY-MM-DD`.
//! - [`UnknownCategory`] for names outside the fixed category set.
//! - [`MissingField`] for required form fields left blank.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`UnknownCategory`]: EngineError::UnknownCategory
//!  [`MissingField`]: EngineError::MissingField
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("{0} is required")]
    MissingField(&'static str),
}
