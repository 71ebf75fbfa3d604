//! Services Layer
//!
//! Business logic called from the HTTP handlers: the entity reconciler
//! that turns validated forms into committed records.

pub mod reconciler;

pub use reconciler::{BookTarget, save_author, save_book, save_genre};
