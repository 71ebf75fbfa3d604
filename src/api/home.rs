use axum::{extract::State, response::Response};

use super::page::PageContext;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::views::pages;

pub async fn homepage(
    page: PageContext,
    State(state): State<AppState>,
) -> Result<Response, DomainError> {
    let books = state.book_repo.find_all().await?;
    let users = state.user_repo.find_all().await?;

    Ok(page.render("Books Catalog", pages::home(&books, &users)))
}
