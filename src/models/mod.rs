pub mod audience;
pub mod author;
pub mod book;
pub mod book_genres;
pub mod genre;
pub mod user;

pub use audience::Audience;
