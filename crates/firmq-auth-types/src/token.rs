//! Session-token claims and validation.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "ISSUER", test))]
use serde::Serialize;
use uuid::Uuid;

/// Session-token lifetime in seconds (24 hours, fixed).
pub const SESSION_TOKEN_EXP: u64 = 86_400;

/// Shared HMAC secret used to sign and verify session tokens.
#[derive(Clone)]
pub struct SessionKey(Arc<str>);

impl SessionKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Arc::from(secret.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Identity extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
    pub is_admin: bool,
    pub name: String,
    pub expires_at: u64,
}

/// Errors returned by [`validate_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims carried by a session token.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `user_id` | account id (UUID string) |
/// | `company_id` | tenant id, `null` when unassigned |
/// | `admin` | global admin flag at issuance |
/// | `name` | display name |
/// | `exp` | expiration, seconds since UNIX epoch |
///
/// [`Serialize`] requires the **`ISSUER`** cargo feature; only the service that mints
/// tokens enables it.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "ISSUER", test), derive(Serialize))]
pub struct SessionClaims {
    pub user_id: String,
    #[serde(default)]
    pub company_id: Option<String>,
    pub admin: bool,
    pub name: String,
    pub exp: u64,
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256 only, `exp` required and checked with no leeway.
fn decode_jwt(token: &str, key: &SessionKey) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(key.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a bearer token value, returning the identity it carries.
pub fn validate_session_token(token: &str, key: &SessionKey) -> Result<SessionInfo, AuthError> {
    let claims = decode_jwt(token, key)?;
    let user_id = claims
        .user_id
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    let company_id = match claims.company_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<Uuid>().map_err(|_| AuthError::Malformed)?),
    };
    Ok(SessionInfo {
        user_id,
        company_id,
        is_admin: claims.admin,
        name: claims.name,
        expires_at: claims.exp,
    })
}

/// Sign claims into a compact HS256 token.
#[cfg(any(feature = "ISSUER", test))]
pub fn sign_session_claims(
    claims: &SessionClaims,
    key: &SessionKey,
) -> Result<String, jsonwebtoken::errors::Error> {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(key.as_bytes()),
    )
}
