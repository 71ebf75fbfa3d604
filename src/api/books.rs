use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use super::page::{PageContext, redirect_with_flash};
use crate::domain::forms::{BookChoices, BookForm};
use crate::domain::{Author, Book, DomainError, FormErrors, Genre};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::CurrentUser;
use crate::services::{BookTarget, save_book};
use crate::views::pages;

/// Authors and genres a book form can pick from
async fn load_choices(state: &AppState) -> Result<(Vec<Author>, Vec<Genre>), DomainError> {
    let authors = state.author_repo.find_all().await?;
    let genres = state.genre_repo.find_all().await?;
    Ok((authors, genres))
}

/// Ids that are not numbers name no book either
fn book_id(raw: &str) -> Result<i32, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::NotFound(format!("Book {}", raw)))
}

async fn find_book(state: &AppState, id: i32) -> Result<Book, DomainError> {
    state
        .book_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Book {}", id)))
}

pub async fn new_book(
    _user: CurrentUser,
    page: PageContext,
    State(state): State<AppState>,
) -> Result<Response, DomainError> {
    let (authors, genres) = load_choices(&state).await?;
    let body = pages::create_book(&BookForm::default(), &FormErrors::new(), &authors, &genres);
    Ok(page.render("Create Book", body))
}

pub async fn create_book(
    _user: CurrentUser,
    page: PageContext,
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, DomainError> {
    let form = BookForm::from_pairs(pairs);
    let (authors, genres) = load_choices(&state).await?;

    match form.validate_against(&BookChoices::new(&authors, &genres)) {
        Ok(valid) => {
            let book = save_book(state.db(), BookTarget::Create, valid).await?;
            Ok(redirect_with_flash(
                &format!("/book/{}", book.id),
                "New book was created successfully.",
            ))
        }
        Err(errors) => {
            tracing::debug!("Book form rejected: {:?}", errors);
            let body = pages::create_book(&form, &errors, &authors, &genres);
            Ok(page.render_with_status(StatusCode::UNPROCESSABLE_ENTITY, "Create Book", body))
        }
    }
}

pub async fn book_detail(
    page: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, DomainError> {
    let id = book_id(&id)?;
    let book = find_book(&state, id).await?;
    let (authors, genres) = load_choices(&state).await?;

    let form = BookForm::from_book(&book);
    let body = pages::book_detail(&book, &form, &FormErrors::new(), &authors, &genres);
    Ok(page.render(&book.title, body))
}

/// Edit submission. Every field is replaced, whether it changed or not.
pub async fn update_book(
    page: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, DomainError> {
    let id = book_id(&id)?;
    let book = find_book(&state, id).await?;
    let form = BookForm::from_pairs(pairs);
    let (authors, genres) = load_choices(&state).await?;

    match form.validate_against(&BookChoices::new(&authors, &genres)) {
        Ok(valid) => {
            save_book(state.db(), BookTarget::Update(id), valid).await?;
            Ok(redirect_with_flash(
                &format!("/book/{}", id),
                "Book successfully updated",
            ))
        }
        Err(errors) => {
            tracing::debug!("Edit of book {} rejected: {:?}", id, errors);
            let body = pages::book_detail(&book, &form, &errors, &authors, &genres);
            Ok(page.render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &book.title, body))
        }
    }
}
