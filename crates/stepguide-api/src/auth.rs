//! Shared-secret bearer token authentication.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

/// Outcome of checking a request's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny,
}

impl AuthDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthDecision::Allow)
    }
}

/// Check that the `Authorization` header is exactly `Bearer <secret>`.
///
/// Fails closed: a missing or non-UTF-8 header, another scheme, a wrong
/// token and an empty configured secret are all denied.
pub fn authorize(headers: &HeaderMap, secret: &str) -> AuthDecision {
    if secret.is_empty() {
        return AuthDecision::Deny;
    }

    let Some(presented) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return AuthDecision::Deny;
    };

    let expected = format!("Bearer {}", secret);
    if secure_compare(presented.as_bytes(), expected.as_bytes()) {
        AuthDecision::Allow
    } else {
        AuthDecision::Deny
    }
}

fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Marker extractor for requests that passed the auth gate.
///
/// Runs before any body extractor, so a bad credential is reported before
/// the submission is looked at.
#[derive(Debug, Clone, Copy)]
pub struct BearerAuth;

#[axum::async_trait]
impl FromRequestParts<AppState> for BearerAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match authorize(&parts.headers, &state.config.import_token) {
            AuthDecision::Allow => Ok(BearerAuth),
            AuthDecision::Deny => {
                warn!(path = %parts.uri.path(), "Rejected request with missing or invalid bearer token");
                metrics::record_auth_denied(parts.uri.path());
                Err(ApiError::unauthorized("Missing or invalid bearer token"))
            }
        }
    }
}
