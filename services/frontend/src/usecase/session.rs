use chrono::Utc;

use firmq_auth_types::token::{SESSION_TOKEN_EXP, SessionClaims, SessionKey, sign_session_claims};

use crate::domain::types::Account;
use crate::error::FrontendError;

/// A signed session token and its expiry (seconds since UNIX epoch).
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: u64,
}

pub fn issue_session_token(account: &Account, key: &SessionKey) -> Result<IssuedToken, FrontendError> {
    let expires_at = Utc::now().timestamp().max(0) as u64 + SESSION_TOKEN_EXP;
    let claims = SessionClaims {
        user_id: account.id.to_string(),
        company_id: account.company_id.map(|c| c.to_string()),
        admin: account.is_admin,
        name: account.name.clone(),
        exp: expires_at,
    };
    let token =
        sign_session_claims(&claims, key).map_err(|e| FrontendError::Internal(e.into()))?;
    Ok(IssuedToken { token, expires_at })
}
