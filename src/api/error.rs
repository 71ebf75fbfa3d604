//! HTTP mapping of domain errors

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::DomainError;
use crate::views::{self, Chrome, pages};

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DomainError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found.", what)),
            DomainError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            DomainError::Conflict(what) => {
                (StatusCode::CONFLICT, format!("{} already exists.", what))
            }
            DomainError::Database(_) | DomainError::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again later.".to_string(),
                )
            }
        };

        let title = status.canonical_reason().unwrap_or("Error");
        (
            status,
            Html(views::layout(title, &Chrome::default(), &pages::error(&message))),
        )
            .into_response()
    }
}
