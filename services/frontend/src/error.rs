use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use firmq_core::envelope::Envelope;
use firmq_domain::access::AccessDenied;

/// Frontend service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("account not found")]
    AccountNotFound,
    #[error("entity not found")]
    EntityNotFound,
    #[error("insufficient permission")]
    Forbidden,
    #[error("authentication required")]
    Unauthenticated,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account with this email already exists")]
    AccountAlreadyExists,
    #[error("email code for this account is expired")]
    EmailCodeExpired,
    #[error("sms code for this account is expired")]
    SmsCodeExpired,
    #[error("wrong sms code")]
    SmsConfirmationFailed,
    #[error("caller is not associated with a company")]
    MissingRequiredField,
    #[error("entity was modified concurrently")]
    RevisionConflict,
    #[error("{0}")]
    InvalidInput(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl FrontendError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::EntityNotFound => "ENTITY_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountAlreadyExists => "ACCOUNT_ALREADY_EXISTS",
            Self::EmailCodeExpired => "EMAIL_CODE_EXPIRED",
            Self::SmsCodeExpired => "SMS_CODE_EXPIRED",
            Self::SmsConfirmationFailed => "SMS_CONFIRMATION_FAILED",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::RevisionConflict => "REVISION_CONFLICT",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::AccountNotFound | Self::EntityNotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AccountAlreadyExists | Self::RevisionConflict => StatusCode::CONFLICT,
            Self::EmailCodeExpired | Self::SmsCodeExpired => StatusCode::GONE,
            Self::SmsConfirmationFailed | Self::MissingRequiredField | Self::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AccessDenied> for FrontendError {
    fn from(_: AccessDenied) -> Self {
        Self::Forbidden
    }
}

impl IntoResponse for FrontendError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Client errors are not logged.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        Envelope::failure(self.kind(), self.to_string()).with_status(status)
    }
}
