//! Bearer-token identity extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;
use uuid::Uuid;

use firmq_core::envelope::Envelope;

use crate::token::{SessionKey, validate_session_token};

/// Caller identity proven by a valid `Authorization: Bearer <token>` header.
///
/// Only the account id is trusted from the token; role and tenant are re-read from
/// the account store by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BearerIdentity {
    pub user_id: Uuid,
}

/// Uniform 401 for every way a credential can be missing or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unauthenticated;

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        Envelope::failure("UNAUTHENTICATED", "authentication required")
            .with_status(StatusCode::UNAUTHORIZED)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for BearerIdentity
where
    SessionKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    // Extract synchronously and return a 'static future; see axum-core's
    // `fn -> impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let key = SessionKey::from_ref(state);
        let result = match bearer_token(parts) {
            Some(token) => validate_session_token(token, &key)
                .map(|info| Self {
                    user_id: info.user_id,
                })
                .map_err(|e| {
                    tracing::debug!(error = %e, "rejected bearer token");
                    Unauthenticated
                }),
            None => Err(Unauthenticated),
        };
        async move { result }
    }
}
