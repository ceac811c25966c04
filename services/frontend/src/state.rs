use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use firmq_auth_types::token::SessionKey;

use crate::infra::db::{DbAccountRepository, DbEntityRepository};
use crate::infra::notify::Notifier;
use crate::usecase::code::CodeTtl;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub session_key: SessionKey,
    pub notifier: Notifier,
    pub ttl: CodeTtl,
}

impl AppState {
    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn entity_repo(&self) -> DbEntityRepository {
        DbEntityRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for SessionKey {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}
