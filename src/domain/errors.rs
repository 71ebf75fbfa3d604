//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound(String),
    /// Validation error with message
    Validation(String),
    /// A unique value is already taken
    Conflict(String),
    /// Database/persistence error
    Database(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound(what) => write!(f, "{} not found", what),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Conflict(what) => write!(f, "{} already exists", what),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}
