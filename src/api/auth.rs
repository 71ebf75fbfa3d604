use axum::{
    Form,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use garde::Validate;
use serde::Deserialize;

use super::page::{PageContext, redirect_with_flash};
use crate::domain::forms::{LoginForm, SignupForm};
use crate::domain::{DomainError, FormErrors};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::{
    clear_session_cookie, create_jwt, hash_password, session_cookie, verify_password,
};
use crate::views::pages;

const USERNAME_TAKEN: &str = "That username is taken. Please choose a different one.";

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    next: Option<String>,
}

/// Only same-site paths are followed after login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

pub async fn signup_page(page: PageContext) -> Response {
    page.render(
        "Sign Up",
        pages::signup(&SignupForm::default(), &FormErrors::new()),
    )
}

pub async fn signup(
    page: PageContext,
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, DomainError> {
    let mut errors = match form.validate() {
        Ok(()) => FormErrors::new(),
        Err(report) => FormErrors::from(report),
    };

    if errors.is_empty()
        && state
            .user_repo
            .find_by_username(&form.username)
            .await?
            .is_some()
    {
        errors.add("username", USERNAME_TAKEN);
    }

    if !errors.is_empty() {
        return Ok(page.render_with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Sign Up",
            pages::signup(&form, &errors),
        ));
    }

    let password_hash = hash_password(&form.password)?;
    match state
        .user_repo
        .create(form.username.clone(), password_hash)
        .await
    {
        Ok(_) => Ok(redirect_with_flash("/login", "Account Created.")),
        // lost a race with a concurrent signup for the same name
        Err(DomainError::Conflict(_)) => Ok(page.render_with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Sign Up",
            pages::signup(&form, &FormErrors::single("username", USERNAME_TAKEN)),
        )),
        Err(e) => Err(e),
    }
}

pub async fn login_page(page: PageContext, Query(query): Query<LoginQuery>) -> Response {
    let form = LoginForm {
        next: query.next,
        ..Default::default()
    };
    page.render("Log In", pages::login(&form, &FormErrors::new()))
}

pub async fn login(
    page: PageContext,
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, DomainError> {
    tracing::info!("Login attempt for user: {}", form.username);

    let rejected = |errors: FormErrors| {
        page.render_with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Log In",
            pages::login(&form, &errors),
        )
    };

    if let Err(report) = form.validate() {
        return Ok(rejected(FormErrors::from(report)));
    }

    let Some((user, password_hash)) = state.user_repo.find_credentials(&form.username).await?
    else {
        tracing::warn!("User not found: {}", form.username);
        return Ok(rejected(FormErrors::single(
            "username",
            "No user with that username. Please try again.",
        )));
    };

    if !verify_password(&form.password, &password_hash)? {
        tracing::warn!("Password verification failed for user: {}", user.username);
        return Ok(rejected(FormErrors::single(
            "password",
            "Password doesn't match. Please try again.",
        )));
    }

    tracing::info!("User {} logged in", user.username);
    let token = create_jwt(user.id, &user.username)?;
    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(&token))]),
        Redirect::to(safe_next(form.next.as_deref())),
    )
        .into_response())
}

pub async fn logout() -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/"),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::safe_next;

    #[test]
    fn next_must_stay_on_site() {
        assert_eq!(safe_next(Some("/create_book")), "/create_book");
        assert_eq!(safe_next(Some("/book/3?x=1")), "/book/3?x=1");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
