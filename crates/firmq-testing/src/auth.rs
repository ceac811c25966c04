//! Mock bearer credentials.
//!
//! Mints real HS256 session tokens so requests pass through the same
//! `BearerIdentity` extractor as production traffic.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use uuid::Uuid;

use firmq_auth_types::token::{SESSION_TOKEN_EXP, SessionClaims, SessionKey, sign_session_claims};

pub const TEST_SECRET: &str = "firmq-test-secret";

/// Configurable identity encoded into a test token.
pub struct MockBearer {
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
    pub is_admin: bool,
    /// Seconds from now until expiry; negative values mint an expired token.
    pub ttl_secs: i64,
    pub key: SessionKey,
}

impl MockBearer {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            company_id: None,
            is_admin: false,
            ttl_secs: SESSION_TOKEN_EXP as i64,
            key: SessionKey::new(TEST_SECRET),
        }
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    pub fn expired(mut self) -> Self {
        self.ttl_secs = -3600;
        self
    }

    pub fn signed_with(mut self, secret: &str) -> Self {
        self.key = SessionKey::new(secret);
        self
    }

    pub fn token(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let claims = SessionClaims {
            user_id: self.user_id.to_string(),
            company_id: self.company_id.map(|c| c.to_string()),
            admin: self.is_admin,
            name: "test".to_owned(),
            exp: (now + self.ttl_secs).max(0) as u64,
        };
        sign_session_claims(&claims, &self.key).unwrap()
    }

    /// `Authorization: Bearer <token>`.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap(),
        );
        map
    }
}
