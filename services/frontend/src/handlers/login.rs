use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::types::AccountProfile;
use crate::error::FrontendError;
use crate::handlers::{body, outcome};
use crate::state::AppState;
use crate::usecase::account::{ConfirmEmailInput, ConfirmEmailUseCase};
use crate::usecase::login::{LoginInput, LoginUseCase};

// ── POST /v1/login ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub sms_code: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: u64,
    pub account: AccountProfile,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, FrontendError> {
    let req = body(payload)?;
    let usecase = LoginUseCase {
        repo: state.account_repo(),
        notifier: state.notifier.clone(),
        session_key: state.session_key.clone(),
        sms_ttl: state.ttl.sms,
    };
    let result = usecase
        .execute(LoginInput {
            email: req.email,
            password: req.password,
            sms_code: req.sms_code,
        })
        .await?;
    Ok(outcome(result.map(|out| LoginResponse {
        token: out.token.token,
        expires_at: out.token.expires_at,
        account: out.account,
    })))
}

// ── POST /v1/confirm-email/{code} ────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ConfirmEmailRequest {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub sms_code: Option<String>,
}

pub async fn confirm_email(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<ConfirmEmailRequest>, JsonRejection>,
) -> Result<Response, FrontendError> {
    let req = body(payload)?;
    let usecase = ConfirmEmailUseCase {
        repo: state.account_repo(),
        notifier: state.notifier.clone(),
        ttl: state.ttl,
    };
    let result = usecase
        .execute(ConfirmEmailInput {
            email_code: code,
            phone: req.phone,
            password: req.password,
            sms_code: req.sms_code,
        })
        .await?;
    Ok(outcome(result))
}
