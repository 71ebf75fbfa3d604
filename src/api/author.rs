use axum::{Form, extract::State, http::StatusCode, response::Response};

use super::page::{PageContext, redirect_with_flash};
use crate::domain::forms::AuthorForm;
use crate::domain::{DomainError, FormErrors};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::CurrentUser;
use crate::services::save_author;
use crate::views::pages;

pub async fn new_author(_user: CurrentUser, page: PageContext) -> Response {
    page.render(
        "Create Author",
        pages::create_author(&AuthorForm::default(), &FormErrors::new()),
    )
}

pub async fn create_author(
    _user: CurrentUser,
    page: PageContext,
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> Result<Response, DomainError> {
    match form.validated() {
        Ok(valid) => {
            save_author(state.db(), valid).await?;
            Ok(redirect_with_flash("/", "New author successfully created!"))
        }
        Err(errors) => Ok(page.render_with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Create Author",
            pages::create_author(&form, &errors),
        )),
    }
}
