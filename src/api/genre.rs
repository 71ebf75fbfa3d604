use axum::{Form, extract::State, http::StatusCode, response::Response};

use super::page::{PageContext, redirect_with_flash};
use crate::domain::forms::GenreForm;
use crate::domain::{DomainError, FormErrors};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::CurrentUser;
use crate::services::save_genre;
use crate::views::pages;

pub async fn new_genre(_user: CurrentUser, page: PageContext) -> Response {
    page.render(
        "Create Genre",
        pages::create_genre(&GenreForm::default(), &FormErrors::new()),
    )
}

pub async fn create_genre(
    _user: CurrentUser,
    page: PageContext,
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> Result<Response, DomainError> {
    match form.validated() {
        Ok(valid) => {
            save_genre(state.db(), valid).await?;
            Ok(redirect_with_flash("/", "New genre successfully created!"))
        }
        Err(errors) => Ok(page.render_with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Create Genre",
            pages::create_genre(&form, &errors),
        )),
    }
}
