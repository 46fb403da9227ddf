//! # Authentication Module
//!
//! The upstream authentication layer verifies the bearer credential and
//! attaches the caller's role and user id as headers before a request gets
//! here. [`Authenticated`] lifts those headers into an
//! [`AuthContext`] so handlers and services never touch raw headers.
//!
//! A request without `Authorization: Bearer <token>` is rejected with 401.
//! Missing or unrecognised role and user-id headers are not rejected here;
//! they leave the matching field of the context empty and the operation
//! decides whether it needs them.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use clinicdesk_core::{
    auth::{AuthContext, Role},
    errors::ClinicError,
};

use crate::middleware::error_handling::AppError;

/// Header carrying the role asserted by the upstream layer.
pub const ROLE_HEADER: &str = "x-user-role";

/// Header carrying the user id asserted by the upstream layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for an already-authenticated caller.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthContext);

/// Returns the token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Builds the caller context from request headers.
pub fn auth_context_from_headers(headers: &HeaderMap) -> Result<AuthContext, ClinicError> {
    let token = bearer_token(headers)
        .ok_or_else(|| ClinicError::Unauthorized("missing bearer token".to_string()))?;

    let mut context = AuthContext::new(token);

    if let Some(raw) = header_str(headers, ROLE_HEADER) {
        match raw.parse::<Role>() {
            Ok(role) => context = context.with_role(role),
            Err(_) => tracing::debug!("Ignoring unrecognised role header: {}", raw),
        }
    }

    if let Some(user_id) = header_str(headers, USER_ID_HEADER) {
        context = context.with_user_id(user_id);
    }

    Ok(context)
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = auth_context_from_headers(&parts.headers)?;
        Ok(Authenticated(context))
    }
}
