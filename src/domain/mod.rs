//! Domain layer - Business abstractions
//!
//! Repository traits, form definitions with their validation rules, and
//! domain error types. No Axum here.

pub mod errors;
pub mod forms;
pub mod repositories;

pub use errors::DomainError;
pub use forms::FormErrors;
pub use repositories::*;
