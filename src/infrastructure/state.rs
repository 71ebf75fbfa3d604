//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AuthorRepository, BookRepository, GenreRepository, UserRepository};
use crate::infrastructure::{
    SeaOrmAuthorRepository, SeaOrmBookRepository, SeaOrmGenreRepository, SeaOrmUserRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection, used by the reconciler for transactional writes
    db: DatabaseConnection,
    pub book_repo: Arc<dyn BookRepository>,
    pub author_repo: Arc<dyn AuthorRepository>,
    pub genre_repo: Arc<dyn GenreRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            book_repo: Arc::new(SeaOrmBookRepository::new(db.clone())),
            author_repo: Arc::new(SeaOrmAuthorRepository::new(db.clone())),
            genre_repo: Arc::new(SeaOrmGenreRepository::new(db.clone())),
            user_repo: Arc::new(SeaOrmUserRepository::new(db.clone())),
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
