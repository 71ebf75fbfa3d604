//! Favorite/unfavorite: routes exist and require a login, but membership
//! changes are not supported yet. No store access happens here.

use axum::{extract::Path, http::StatusCode, response::IntoResponse};

use crate::infrastructure::auth::CurrentUser;

pub const NOT_IMPLEMENTED: &str = "Not yet implemented!";

pub async fn favorite_book(user: CurrentUser, Path(book_id): Path<i32>) -> impl IntoResponse {
    tracing::debug!("{} asked to favorite book {}", user.username, book_id);
    (StatusCode::NOT_IMPLEMENTED, NOT_IMPLEMENTED)
}

pub async fn unfavorite_book(user: CurrentUser, Path(book_id): Path<i32>) -> impl IntoResponse {
    tracing::debug!("{} asked to unfavorite book {}", user.username, book_id);
    (StatusCode::NOT_IMPLEMENTED, NOT_IMPLEMENTED)
}
