//! SeaORM implementations of the domain repositories

mod author_repository;
mod book_repository;
mod genre_repository;
mod user_repository;

pub use author_repository::SeaOrmAuthorRepository;
pub use book_repository::SeaOrmBookRepository;
pub use genre_repository::SeaOrmGenreRepository;
pub use user_repository::SeaOrmUserRepository;
