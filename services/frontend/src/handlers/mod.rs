pub mod account;
pub mod entity;
pub mod health;
pub mod login;

use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;

use firmq_auth_types::identity::BearerIdentity;
use firmq_core::envelope::Envelope;
use firmq_domain::access::Caller;

use crate::domain::types::{Challenge, Outcome};
use crate::error::FrontendError;
use crate::state::AppState;
use crate::usecase::caller::ResolveCallerUseCase;

/// Body of a 428 response: which input the client must send next.
#[derive(Serialize)]
struct Required {
    required: Challenge,
}

pub(crate) fn ok<T: Serialize>(data: T) -> Response {
    Envelope::success(data).with_status(StatusCode::OK)
}

/// 200 on completion, 428 when another verification step is needed.
pub(crate) fn outcome<T: Serialize>(outcome: Outcome<T>) -> Response {
    match outcome {
        Outcome::Success(data) => ok(data),
        Outcome::NeedsMoreInput(required) => Envelope::precondition_required(Required { required })
            .with_status(StatusCode::PRECONDITION_REQUIRED),
    }
}

pub(crate) async fn caller(
    state: &AppState,
    identity: BearerIdentity,
) -> Result<Caller, FrontendError> {
    ResolveCallerUseCase {
        repo: state.account_repo(),
    }
    .execute(identity.user_id)
    .await
}

pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Result<T, FrontendError> {
    raw.parse()
        .map_err(|_| FrontendError::InvalidInput(format!("invalid id: {raw}")))
}

pub(crate) fn body<T>(payload: Result<axum::Json<T>, JsonRejection>) -> Result<T, FrontendError> {
    payload
        .map(|axum::Json(v)| v)
        .map_err(|e| FrontendError::InvalidInput(e.body_text()))
}
