use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use firmq_core::envelope::Envelope;

use crate::state::AppState;

/// `GET /healthz`: liveness.
pub async fn healthz() -> Response {
    Envelope::empty().with_status(StatusCode::OK)
}

/// `GET /readyz`: ready once the database answers.
pub async fn readyz(State(state): State<AppState>) -> Response {
    match state.db.ping().await {
        Ok(()) => Envelope::empty().with_status(StatusCode::OK),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            Envelope::failure("UNAVAILABLE", "database unreachable")
                .with_status(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
