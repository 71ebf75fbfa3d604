pub mod auth;
pub mod author;
pub mod books;
pub mod error;
pub mod favorites;
pub mod genre;
pub mod health;
pub mod home;
pub mod page;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Catalog
        .route("/", get(home::homepage))
        .route(
            "/create_book",
            get(books::new_book).post(books::create_book),
        )
        .route(
            "/create_author",
            get(author::new_author).post(author::create_author),
        )
        .route(
            "/create_genre",
            get(genre::new_genre).post(genre::create_genre),
        )
        .route(
            "/book/:id",
            get(books::book_detail).post(books::update_book),
        )
        // Users
        .route("/profile/:username", get(profile::profile))
        .route("/favorite/:id", post(favorites::favorite_book))
        .route("/unfavorite/:id", post(favorites::unfavorite_book))
        // Auth
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .with_state(state)
}
