use axum::{
    Router,
    routing::{get, post},
};

use firmq_core::middleware::with_observability;

use crate::handlers::{
    account::{
        create_account, delete_account, get_account, list_accounts, list_company_accounts,
        update_account,
    },
    entity::{create_entity, get_entity, get_entity_revisions, list_entities, update_entity},
    health::{healthz, readyz},
    login::{confirm_email, login},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Authentication
        .route("/v1/login", post(login))
        .route("/v1/confirm-email/{code}", post(confirm_email))
        // Accounts
        .route("/v1/user", post(create_account).get(list_accounts))
        .route(
            "/v1/user/{id}",
            get(get_account).post(update_account).delete(delete_account),
        )
        .route("/v1/company/{id}/users", get(list_company_accounts))
        // Entities
        .route("/v1/entity", post(create_entity).get(list_entities))
        .route("/v1/entity/{id}", get(get_entity).post(update_entity))
        .route("/v1/entity/{id}/revisions", get(get_entity_revisions))
        .with_state(state);
    with_observability(router)
}
