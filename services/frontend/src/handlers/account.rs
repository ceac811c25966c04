use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use firmq_auth_types::identity::BearerIdentity;
use firmq_core::envelope::Envelope;
use firmq_domain::id::{AccountId, CompanyId};

use crate::error::FrontendError;
use crate::handlers::{body, caller, ok, outcome, parse_id};
use crate::state::AppState;
use crate::usecase::account::{
    CreateAccountInput, CreateAccountUseCase, DeleteAccountUseCase, GetAccountUseCase,
    ListAccountsByCompanyUseCase, ListAccountsUseCase, UpdateAccountInput, UpdateAccountUseCase,
};

// ── POST /v1/user ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: AccountId,
}

pub async fn create_account(
    identity: BearerIdentity,
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let req = body(payload)?;
    let usecase = CreateAccountUseCase {
        repo: state.account_repo(),
        notifier: state.notifier.clone(),
    };
    let id = usecase
        .execute(
            &caller,
            CreateAccountInput {
                email: req.email,
                name: req.name,
                is_admin: req.is_admin,
                company_id: req.company_id,
            },
        )
        .await?;
    Ok(ok(CreatedResponse { id }))
}

// ── GET /v1/user ─────────────────────────────────────────────────────────────

pub async fn list_accounts(
    identity: BearerIdentity,
    State(state): State<AppState>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let usecase = ListAccountsUseCase {
        repo: state.account_repo(),
    };
    Ok(ok(usecase.execute(&caller).await?))
}

// ── GET /v1/user/{id} ────────────────────────────────────────────────────────

pub async fn get_account(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let target: AccountId = parse_id(&id)?;
    let usecase = GetAccountUseCase {
        repo: state.account_repo(),
    };
    Ok(ok(usecase.execute(&caller, target).await?))
}

// ── POST /v1/user/{id} ───────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub sms_code: Option<String>,
}

pub async fn update_account(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let target: AccountId = parse_id(&id)?;
    let req = body(payload)?;
    let usecase = UpdateAccountUseCase {
        repo: state.account_repo(),
        notifier: state.notifier.clone(),
        ttl: state.ttl,
    };
    let result = usecase
        .execute(
            &caller,
            target,
            UpdateAccountInput {
                email: req.email,
                name: req.name,
                password: req.password,
                phone: req.phone,
                is_admin: req.is_admin,
                company_id: req.company_id,
                sms_code: req.sms_code,
            },
        )
        .await?;
    Ok(outcome(result))
}

// ── DELETE /v1/user/{id} ─────────────────────────────────────────────────────

pub async fn delete_account(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let target: AccountId = parse_id(&id)?;
    let usecase = DeleteAccountUseCase {
        repo: state.account_repo(),
    };
    usecase.execute(&caller, target).await?;
    Ok(Envelope::empty().with_status(axum::http::StatusCode::OK))
}

// ── GET /v1/company/{id}/users ───────────────────────────────────────────────

pub async fn list_company_accounts(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let company_id: CompanyId = parse_id(&id)?;
    let usecase = ListAccountsByCompanyUseCase {
        repo: state.account_repo(),
    };
    Ok(ok(usecase.execute(&caller, company_id).await?))
}
