use axum::{
    extract::{Path, State},
    response::Response,
};

use super::page::PageContext;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::CurrentUser;
use crate::views::pages;

/// Read-only profile page; there is no profile editing.
pub async fn profile(
    _viewer: CurrentUser,
    page: PageContext,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response, DomainError> {
    let user = state
        .user_repo
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("User {}", username)))?;

    Ok(page.render(&user.username, pages::profile(&user)))
}
