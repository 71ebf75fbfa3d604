//! Repository trait definitions
//!
//! These traits define the read side of the catalog plus account creation.
//! Catalog writes go through `services::reconciler`.

use async_trait::async_trait;
use serde::Serialize;

use super::DomainError;
use crate::models::Audience;

/// Author data for pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub biography: String,
}

/// Genre data for pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// A book as listed on the homepage
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author_name: Option<String>,
}

/// A book with its author and genres resolved
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub publish_date: String,
    pub audience: Audience,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
}

/// Public user data; the password hash never leaves the repository
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// List every book with its author's name
    async fn find_all(&self) -> Result<Vec<BookSummary>, DomainError>;

    /// Find a single book by ID, with author and genres
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;
}

/// Repository trait for Author entity
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Find all authors, ordered by name
    async fn find_all(&self) -> Result<Vec<Author>, DomainError>;
}

/// Repository trait for Genre entity
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// Find all genres, ordered by name
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError>;
}

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find all users, ordered by username
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user together with their stored password hash
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, DomainError>;

    /// Create a user from an already-hashed password
    async fn create(&self, username: String, password_hash: String) -> Result<User, DomainError>;
}
