//! Uniform response envelope.
//!
//! Every body leaving a FirmQ service has the shape
//! `{"ok": bool, "error": string, "status": string, "data"?: T}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Status classifier for successful calls.
pub const STATUS_OK: &str = "OK";

/// Status classifier for a non-terminal step that needs more input from the caller.
pub const STATUS_PRECONDITION_REQUIRED: &str = "PRECONDITION_REQUIRED";

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub ok: bool,
    pub error: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            error: String::new(),
            status: STATUS_OK,
            data: Some(data),
        }
    }

    /// Non-terminal: the call was accepted but another round trip is required.
    pub fn precondition_required(data: T) -> Self {
        Self {
            ok: true,
            error: String::new(),
            status: STATUS_PRECONDITION_REQUIRED,
            data: Some(data),
        }
    }

    /// Attach an HTTP status and render as JSON.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl Envelope<()> {
    /// Success without payload.
    pub fn empty() -> Self {
        Self {
            ok: true,
            error: String::new(),
            status: STATUS_OK,
            data: None,
        }
    }

    pub fn failure(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: message.into(),
            status: kind,
            data: None,
        }
    }
}
