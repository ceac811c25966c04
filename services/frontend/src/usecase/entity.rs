use tracing::info;

use firmq_domain::access::{Caller, TenantScope};
use firmq_domain::id::{CompanyId, EntityId};

use crate::domain::repository::EntityRepository;
use crate::domain::types::{EntityBody, EntityRevision};
use crate::error::FrontendError;
use crate::usecase::code;

/// Writes go to the caller's own company; there is no cross-tenant write.
fn write_company(caller: &Caller) -> Result<CompanyId, FrontendError> {
    caller.company_id.ok_or(FrontendError::MissingRequiredField)
}

fn read_scope(caller: &Caller) -> Result<TenantScope, FrontendError> {
    caller.read_scope().ok_or(FrontendError::MissingRequiredField)
}

fn validate(body: &EntityBody) -> Result<(), FrontendError> {
    if body.entity_type.trim().is_empty() {
        return Err(FrontendError::InvalidInput("type is required".into()));
    }
    Ok(())
}

// ── CreateEntity ─────────────────────────────────────────────────────────────

pub struct CreateEntityUseCase<R: EntityRepository> {
    pub repo: R,
}

impl<R: EntityRepository> CreateEntityUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        body: EntityBody,
    ) -> Result<EntityRevision, FrontendError> {
        let company_id = write_company(caller)?;
        validate(&body)?;
        let revision = EntityRevision {
            entity_id: EntityId::new(),
            rev: 0,
            latest: true,
            company_id,
            created_by: caller.id,
            created_at: code::now(),
            body,
        };
        self.repo.insert_first(&revision).await?;
        info!(entity_id = %revision.entity_id, rev = 0, "entity created");
        Ok(revision)
    }
}

// ── UpdateEntity ─────────────────────────────────────────────────────────────

pub struct UpdateEntityUseCase<R: EntityRepository> {
    pub repo: R,
}

impl<R: EntityRepository> UpdateEntityUseCase<R> {
    /// Append a new latest revision; earlier revisions are never rewritten.
    pub async fn execute(
        &self,
        caller: &Caller,
        id: EntityId,
        body: EntityBody,
    ) -> Result<EntityRevision, FrontendError> {
        let company_id = write_company(caller)?;
        validate(&body)?;
        let previous = self
            .repo
            .find_latest(id, TenantScope::Company(company_id))
            .await?
            .ok_or(FrontendError::EntityNotFound)?;

        let next = EntityRevision {
            entity_id: previous.entity_id,
            rev: previous.rev + 1,
            latest: true,
            company_id: previous.company_id,
            created_by: caller.id,
            created_at: code::now(),
            body,
        };
        self.repo.append_successor(&previous, &next).await?;
        info!(entity_id = %next.entity_id, rev = next.rev, "entity revised");
        Ok(next)
    }
}

// ── Reads ────────────────────────────────────────────────────────────────────

pub struct GetLatestEntityUseCase<R: EntityRepository> {
    pub repo: R,
}

impl<R: EntityRepository> GetLatestEntityUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: EntityId,
    ) -> Result<EntityRevision, FrontendError> {
        let scope = read_scope(caller)?;
        self.repo
            .find_latest(id, scope)
            .await?
            .ok_or(FrontendError::EntityNotFound)
    }
}

pub struct GetEntityHistoryUseCase<R: EntityRepository> {
    pub repo: R,
}

impl<R: EntityRepository> GetEntityHistoryUseCase<R> {
    /// All revisions, highest `rev` first.
    pub async fn execute(
        &self,
        caller: &Caller,
        id: EntityId,
    ) -> Result<Vec<EntityRevision>, FrontendError> {
        let scope = read_scope(caller)?;
        let history = self.repo.history(id, scope).await?;
        if history.is_empty() {
            return Err(FrontendError::EntityNotFound);
        }
        Ok(history)
    }
}

pub struct ListEntitiesUseCase<R: EntityRepository> {
    pub repo: R,
}

impl<R: EntityRepository> ListEntitiesUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        entity_type: Option<&str>,
    ) -> Result<Vec<EntityRevision>, FrontendError> {
        let scope = read_scope(caller)?;
        let entity_type = entity_type.filter(|t| !t.is_empty());
        self.repo.list_latest(scope, entity_type).await
    }
}
