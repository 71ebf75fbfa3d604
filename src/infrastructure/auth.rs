use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use once_cell::sync::Lazy;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::env;

use crate::domain::DomainError;

pub const SESSION_COOKIE: &str = "session";
const SESSION_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub uid: i32,
    pub exp: usize,
}

static JWT_SECRET: Lazy<Vec<u8>> = Lazy::new(|| match env::var("JWT_SECRET") {
    Ok(secret) if !secret.is_empty() => secret.into_bytes(),
    _ => {
        tracing::warn!("JWT_SECRET not set, using a random secret; sessions end on restart");
        let mut secret = vec![0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        secret
    }
});

/// The logged-in user, decoded from the session cookie (or a bearer token).
///
/// Rejects with a redirect to `/login?next=<current path>`, so handlers that
/// take a `CurrentUser` never run for anonymous requests.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
}

#[derive(Debug)]
pub struct LoginRedirect(String);

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.0).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let next = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let login = LoginRedirect(format!("/login?next={}", urlencoding::encode(next)));

        let Some(token) = session_token(&parts.headers) else {
            tracing::debug!("No session for {}, redirecting to login", next);
            return Err(login);
        };

        match decode_jwt(&token) {
            Ok(claims) => Ok(CurrentUser {
                id: claims.uid,
                username: claims.sub,
            }),
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                Err(login)
            }
        }
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = cookie_value(headers, SESSION_COOKIE) {
        return Some(token);
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Value of the first cookie called `name`, across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_HOURS * 3600
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DomainError::Internal(e.to_string()))?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, DomainError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn create_jwt(user_id: i32, username: &str) -> Result<String, DomainError> {
    let expiration = (Utc::now() + Duration::hours(SESSION_HOURS)).timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        uid: user_id,
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&JWT_SECRET),
    )
    .map_err(|e| DomainError::Internal(e.to_string()))
}

pub fn decode_jwt(token: &str) -> Result<Claims, DomainError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&JWT_SECRET),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| DomainError::Validation(e.to_string()))
}
