//! Page context: the viewer and the one-shot flash message.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use std::convert::Infallible;

use crate::infrastructure::auth::{CurrentUser, cookie_value};
use crate::views::{self, Chrome};

pub const FLASH_COOKIE: &str = "flash";

pub fn flash_cookie(message: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        urlencoding::encode(message)
    )
}

pub fn clear_flash_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", FLASH_COOKIE)
}

/// Redirect and leave a confirmation for the next rendered page
pub fn redirect_with_flash(location: &str, message: &str) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, flash_cookie(message))]),
        Redirect::to(location),
    )
        .into_response()
}

/// Everything the layout needs. Never rejects: anonymous viewers simply
/// have no `user`.
#[derive(Debug, Default)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub flash: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await.ok();
        let flash = cookie_value(&parts.headers, FLASH_COOKIE)
            .and_then(|raw| urlencoding::decode(&raw).ok().map(|m| m.into_owned()))
            .filter(|message| !message.is_empty());

        Ok(Self { user, flash })
    }
}

impl PageContext {
    pub fn render(&self, title: &str, body: String) -> Response {
        self.render_with_status(StatusCode::OK, title, body)
    }

    /// Render inside the layout; a displayed flash is cleared in the same response.
    pub fn render_with_status(&self, status: StatusCode, title: &str, body: String) -> Response {
        let chrome = Chrome {
            user: self.user.as_ref().map(|u| u.username.as_str()),
            flash: self.flash.as_deref(),
        };
        let html = Html(views::layout(title, &chrome, &body));

        if self.flash.is_some() {
            (
                status,
                [(header::SET_COOKIE, clear_flash_cookie())],
                html,
            )
                .into_response()
        } else {
            (status, html).into_response()
        }
    }
}
